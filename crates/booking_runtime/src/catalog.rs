//! Pure helpers the pages derive their views with: distance sort for the
//! browse page, operating-hours badges, and the owner dashboard's filter and
//! rollup math. Nothing here touches a store or a collaborator.

use booking_contract::{Booking, BookingStatus, PaymentStatus, Salon};
use chrono::{DateTime, Duration, FixedOffset, NaiveDateTime, NaiveTime, Timelike};

/// Great-circle distance in kilometres between two WGS84 coordinates.
pub fn haversine_km(lat1: f64, lng1: f64, lat2: f64, lng2: f64) -> f64 {
    const EARTH_RADIUS_KM: f64 = 6371.0;
    let d_lat = (lat2 - lat1).to_radians();
    let d_lng = (lng2 - lng1).to_radians();
    let a = (d_lat / 2.0).sin().powi(2)
        + lat1.to_radians().cos() * lat2.to_radians().cos() * (d_lng / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * a.sqrt().atan2((1.0 - a).sqrt())
}

/// Distance from the visitor to a salon, when both coordinates are known.
pub fn salon_distance_km(salon: &Salon, lat: f64, lng: f64) -> Option<f64> {
    Some(haversine_km(lat, lng, salon.lat?, salon.lng?))
}

/// Sorts salons nearest-first relative to the visitor's position. Salons
/// without coordinates keep their relative order at the end of the list.
pub fn sort_salons_by_distance(salons: &mut [Salon], lat: f64, lng: f64) {
    salons.sort_by(|a, b| {
        let da = salon_distance_km(a, lat, lng).unwrap_or(f64::INFINITY);
        let db = salon_distance_km(b, lat, lng).unwrap_or(f64::INFINITY);
        da.partial_cmp(&db).unwrap_or(std::cmp::Ordering::Equal)
    });
}

/// Case-insensitive substring match over a salon's name and address.
pub fn matches_search(salon: &Salon, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }
    salon.name.to_lowercase().contains(&query) || salon.address.to_lowercase().contains(&query)
}

/// Parses a backend clock string, `HH:MM` or `HH:MM:SS`.
pub fn parse_clock(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(value, "%H:%M"))
        .ok()
}

fn operating_window(
    open_time: Option<&str>,
    close_time: Option<&str>,
    now: NaiveDateTime,
) -> Option<(NaiveDateTime, NaiveDateTime)> {
    let open = now.date().and_time(parse_clock(open_time?)?);
    let mut close = now.date().and_time(parse_clock(close_time?)?);
    // A close at or before the open belongs to the next day.
    if close <= open {
        close += Duration::days(1);
    }
    Some((open, close))
}

/// Whether the salon is open at `now`. Unknown hours count as closed.
pub fn is_open_now(open_time: Option<&str>, close_time: Option<&str>, now: NaiveDateTime) -> bool {
    match operating_window(open_time, close_time, now) {
        Some((open, close)) => {
            (now >= open && now < close)
                // Inside the carried-over tail of yesterday's window.
                || (now + Duration::days(1) >= open && now + Duration::days(1) < close)
        }
        None => false,
    }
}

fn humanize(duration: Duration) -> String {
    let minutes = duration.num_minutes().max(0);
    let (h, m) = (minutes / 60, minutes % 60);
    if h == 0 {
        format!("{m}m")
    } else {
        format!("{h}h {m}m")
    }
}

/// Short operating-hours badge: "Closes in 2h 15m" while open, "Opens in 45m"
/// while closed. `None` when hours are unknown.
pub fn open_badge(
    open_time: Option<&str>,
    close_time: Option<&str>,
    now: NaiveDateTime,
) -> Option<String> {
    let (open, close) = operating_window(open_time, close_time, now)?;
    if is_open_now(open_time, close_time, now) {
        let close = if now >= open { close } else { close - Duration::days(1) };
        Some(format!("Closes in {}", humanize(close - now)))
    } else {
        let open = if now < open { open } else { open + Duration::days(1) };
        Some(format!("Opens in {}", humanize(open - now)))
    }
}

/// Salons owned by the given user.
pub fn owner_salons(salons: &[Salon], owner_id: u64) -> Vec<Salon> {
    salons.iter().filter(|s| s.owner == owner_id).cloned().collect()
}

/// Bookings held at any of the given salons.
pub fn bookings_for_salons(bookings: &[Booking], salons: &[Salon]) -> Vec<Booking> {
    bookings
        .iter()
        .filter(|b| salons.iter().any(|s| s.id == b.salon.id))
        .cloned()
        .collect()
}

/// Sort direction for the owner booking table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    /// Latest start time first.
    #[default]
    NewestFirst,
    /// Earliest start time first.
    OldestFirst,
}

/// Filter state of the owner booking table. The default matches everything.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct OwnerBookingFilter {
    /// Substring over booking id, customer username, service and salon name.
    pub search: String,
    /// Keep only this booking status.
    pub status: Option<BookingStatus>,
    /// Keep only bookings whose payment has this status.
    pub payment: Option<PaymentStatus>,
    /// Keep only bookings at this salon.
    pub salon: Option<u64>,
    /// Sort direction by start time.
    pub sort: SortOrder,
}

fn matches_booking_search(booking: &Booking, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }
    booking.id.to_string().contains(query)
        || booking
            .customer
            .as_ref()
            .is_some_and(|c| c.username.to_lowercase().contains(query))
        || booking.service.name.to_lowercase().contains(query)
        || booking.salon.name.to_lowercase().contains(query)
}

/// Applies the owner table's filters and sort.
pub fn filter_owner_bookings(bookings: &[Booking], filter: &OwnerBookingFilter) -> Vec<Booking> {
    let query = filter.search.trim().to_lowercase();
    let mut out: Vec<Booking> = bookings
        .iter()
        .filter(|b| matches_booking_search(b, &query))
        .filter(|b| filter.status.map_or(true, |status| b.status == status))
        .filter(|b| {
            filter
                .payment
                .map_or(true, |status| b.payment.as_ref().is_some_and(|p| p.status == status))
        })
        .filter(|b| filter.salon.map_or(true, |id| b.salon.id == id))
        .cloned()
        .collect();
    out.sort_by(|a, b| {
        let ta = parse_timestamp(&a.start_time);
        let tb = parse_timestamp(&b.start_time);
        match filter.sort {
            SortOrder::NewestFirst => tb.cmp(&ta),
            SortOrder::OldestFirst => ta.cmp(&tb),
        }
    });
    out
}

/// Earnings rollup over the owner's bookings.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EarningsSummary {
    /// Pending plus cleared.
    pub total: f64,
    /// Payments still pending.
    pub pending: f64,
    /// Completed payments.
    pub cleared: f64,
}

/// Sums payment amounts by settlement status. Cancelled bookings, bookings
/// without a payment, and failed payments contribute nothing.
pub fn earnings_summary(bookings: &[Booking]) -> EarningsSummary {
    let mut summary = EarningsSummary::default();
    for booking in bookings {
        if booking.status == BookingStatus::Cancelled {
            continue;
        }
        let Some(payment) = &booking.payment else {
            continue;
        };
        match payment.status {
            PaymentStatus::Completed => {
                summary.cleared += payment.amount;
                summary.total += payment.amount;
            }
            PaymentStatus::Pending => {
                summary.pending += payment.amount;
                summary.total += payment.amount;
            }
            PaymentStatus::Failed => {}
        }
    }
    summary
}

/// Status tallies for the owner dashboard cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BookingCounts {
    /// Awaiting confirmation.
    pub pending: usize,
    /// Confirmed.
    pub confirmed: usize,
    /// Cancelled.
    pub cancelled: usize,
    /// Delivered.
    pub completed: usize,
}

/// Tallies bookings by lifecycle status.
pub fn booking_counts(bookings: &[Booking]) -> BookingCounts {
    let mut counts = BookingCounts::default();
    for booking in bookings {
        match booking.status {
            BookingStatus::Pending => counts.pending += 1,
            BookingStatus::Confirmed => counts.confirmed += 1,
            BookingStatus::Cancelled => counts.cancelled += 1,
            BookingStatus::Completed => counts.completed += 1,
        }
    }
    counts
}

/// Parses an RFC 3339 timestamp; `None` keeps malformed values sortable.
pub fn parse_timestamp(value: &str) -> Option<DateTime<FixedOffset>> {
    DateTime::parse_from_rfc3339(value).ok()
}

/// "Tue 14 May 2024" for a booking's start, or the raw value when it does not
/// parse.
pub fn format_day(start: &str) -> String {
    match parse_timestamp(start) {
        Some(ts) => ts.format("%a %d %b %Y").to_string(),
        None => start.to_string(),
    }
}

/// "10:00 – 10:30", or just the start clock when the end is unknown.
pub fn format_time_range(start: &str, end: Option<&str>) -> String {
    let clock = |value: &str| match parse_timestamp(value) {
        Some(ts) => format!("{:02}:{:02}", ts.hour(), ts.minute()),
        None => value.to_string(),
    };
    match end {
        Some(end) => format!("{} – {}", clock(start), clock(end)),
        None => clock(start),
    }
}

#[cfg(test)]
mod tests {
    use booking_contract::{Payment, PaymentMethod, Service, UserProfile};
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    use super::*;

    fn salon(id: u64, owner: u64, coords: Option<(f64, f64)>) -> Salon {
        Salon {
            id,
            owner,
            name: format!("Salon {id}"),
            address: "1 Main St".to_string(),
            lat: coords.map(|(lat, _)| lat),
            lng: coords.map(|(_, lng)| lng),
            open_time: Some("09:00:00".to_string()),
            close_time: Some("18:00:00".to_string()),
        }
    }

    fn booking(id: u64, salon_id: u64, start: &str, status: BookingStatus) -> Booking {
        Booking {
            id,
            customer: Some(UserProfile {
                id: 1,
                username: "alice".to_string(),
                email: None,
                role: booking_contract::Role::Customer,
                phone: None,
                first_name: None,
                last_name: None,
            }),
            salon: salon(salon_id, 2, None),
            service: Service {
                id: 9,
                salon: salon_id,
                name: "Cut".to_string(),
                description: String::new(),
                duration_minutes: 30,
                price: 25.0,
                is_home_service: false,
            },
            start_time: start.to_string(),
            end_time: None,
            status,
            payment: None,
            created_at: None,
        }
    }

    fn with_payment(mut booking: Booking, amount: f64, status: PaymentStatus) -> Booking {
        booking.payment = Some(Payment {
            id: booking.id + 100,
            booking: Some(booking.id),
            amount,
            method: PaymentMethod::Cod,
            status,
            created_at: None,
            updated_at: None,
        });
        booking
    }

    fn noon() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 14)
            .expect("date")
            .and_hms_opt(12, 0, 0)
            .expect("time")
    }

    #[test]
    fn haversine_matches_a_known_distance() {
        // London to Paris, roughly 343 km.
        let km = haversine_km(51.5074, -0.1278, 48.8566, 2.3522);
        assert!((km - 343.0).abs() < 5.0, "got {km}");
    }

    #[test]
    fn distance_sort_puts_coordinate_less_salons_last() {
        let mut salons = vec![
            salon(1, 2, None),
            salon(2, 2, Some((48.8566, 2.3522))),
            salon(3, 2, Some((51.5, -0.12))),
        ];
        sort_salons_by_distance(&mut salons, 51.5074, -0.1278);
        let ids: Vec<u64> = salons.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
    }

    #[test]
    fn search_matches_name_and_address_case_insensitively() {
        let mut s = salon(1, 2, None);
        s.name = "Shear Genius".to_string();
        s.address = "12 High St".to_string();
        assert!(matches_search(&s, "shear"));
        assert!(matches_search(&s, "HIGH"));
        assert!(matches_search(&s, "  "));
        assert!(!matches_search(&s, "barber"));
    }

    #[test]
    fn clock_parsing_accepts_both_backend_shapes() {
        assert_eq!(
            parse_clock("09:30"),
            NaiveTime::from_hms_opt(9, 30, 0)
        );
        assert_eq!(
            parse_clock("09:30:15"),
            NaiveTime::from_hms_opt(9, 30, 15)
        );
        assert_eq!(parse_clock("nope"), None);
    }

    #[test]
    fn open_within_plain_daytime_hours() {
        assert!(is_open_now(Some("09:00"), Some("18:00"), noon()));
        assert!(!is_open_now(Some("13:00"), Some("18:00"), noon()));
        assert!(!is_open_now(None, Some("18:00"), noon()));
    }

    #[test]
    fn close_past_midnight_wraps_to_the_next_day() {
        let late = noon().date().and_hms_opt(23, 0, 0).expect("time");
        let small_hours = noon().date().and_hms_opt(1, 0, 0).expect("time");
        assert!(is_open_now(Some("20:00"), Some("02:00"), late));
        assert!(is_open_now(Some("20:00"), Some("02:00"), small_hours));
        assert!(!is_open_now(Some("20:00"), Some("02:00"), noon()));
    }

    #[test]
    fn badge_reports_time_to_close_and_to_open() {
        assert_eq!(
            open_badge(Some("09:00"), Some("18:00"), noon()).as_deref(),
            Some("Closes in 6h 0m")
        );
        let early = noon().date().and_hms_opt(8, 15, 0).expect("time");
        assert_eq!(
            open_badge(Some("09:00"), Some("18:00"), early).as_deref(),
            Some("Opens in 45m")
        );
        assert_eq!(open_badge(None, None, noon()), None);
    }

    #[test]
    fn badge_after_close_counts_to_tomorrows_open() {
        let evening = noon().date().and_hms_opt(20, 0, 0).expect("time");
        assert_eq!(
            open_badge(Some("09:00"), Some("18:00"), evening).as_deref(),
            Some("Opens in 13h 0m")
        );
    }

    #[test]
    fn owner_helpers_scope_by_ownership() {
        let salons = vec![salon(1, 2, None), salon(2, 7, None), salon(3, 2, None)];
        let mine = owner_salons(&salons, 2);
        assert_eq!(mine.iter().map(|s| s.id).collect::<Vec<_>>(), vec![1, 3]);

        let bookings = vec![
            booking(10, 1, "2024-05-14T10:00:00Z", BookingStatus::Pending),
            booking(11, 2, "2024-05-14T11:00:00Z", BookingStatus::Pending),
        ];
        let scoped = bookings_for_salons(&bookings, &mine);
        assert_eq!(scoped.iter().map(|b| b.id).collect::<Vec<_>>(), vec![10]);
    }

    #[test]
    fn filters_compose_and_sort_by_start_time() {
        let bookings = vec![
            booking(10, 1, "2024-05-14T10:00:00Z", BookingStatus::Pending),
            with_payment(
                booking(11, 1, "2024-05-15T10:00:00Z", BookingStatus::Confirmed),
                25.0,
                PaymentStatus::Pending,
            ),
            booking(12, 2, "2024-05-13T10:00:00Z", BookingStatus::Confirmed),
        ];

        let newest = filter_owner_bookings(&bookings, &OwnerBookingFilter::default());
        assert_eq!(newest.iter().map(|b| b.id).collect::<Vec<_>>(), vec![11, 10, 12]);

        let filter = OwnerBookingFilter {
            status: Some(BookingStatus::Confirmed),
            salon: Some(1),
            payment: Some(PaymentStatus::Pending),
            ..Default::default()
        };
        let filtered = filter_owner_bookings(&bookings, &filter);
        assert_eq!(filtered.iter().map(|b| b.id).collect::<Vec<_>>(), vec![11]);

        let searched = filter_owner_bookings(
            &bookings,
            &OwnerBookingFilter {
                search: "ALICE".to_string(),
                sort: SortOrder::OldestFirst,
                ..Default::default()
            },
        );
        assert_eq!(searched.iter().map(|b| b.id).collect::<Vec<_>>(), vec![12, 10, 11]);
    }

    #[test]
    fn earnings_skip_cancelled_failed_and_unpaid() {
        let bookings = vec![
            with_payment(
                booking(1, 1, "2024-05-14T10:00:00Z", BookingStatus::Confirmed),
                40.0,
                PaymentStatus::Completed,
            ),
            with_payment(
                booking(2, 1, "2024-05-14T11:00:00Z", BookingStatus::Pending),
                25.0,
                PaymentStatus::Pending,
            ),
            with_payment(
                booking(3, 1, "2024-05-14T12:00:00Z", BookingStatus::Cancelled),
                30.0,
                PaymentStatus::Completed,
            ),
            with_payment(
                booking(4, 1, "2024-05-14T13:00:00Z", BookingStatus::Confirmed),
                15.0,
                PaymentStatus::Failed,
            ),
            booking(5, 1, "2024-05-14T14:00:00Z", BookingStatus::Confirmed),
        ];
        let summary = earnings_summary(&bookings);
        assert_eq!(summary.cleared, 40.0);
        assert_eq!(summary.pending, 25.0);
        assert_eq!(summary.total, 65.0);
    }

    #[test]
    fn counts_tally_each_status() {
        let bookings = vec![
            booking(1, 1, "2024-05-14T10:00:00Z", BookingStatus::Pending),
            booking(2, 1, "2024-05-14T11:00:00Z", BookingStatus::Confirmed),
            booking(3, 1, "2024-05-14T12:00:00Z", BookingStatus::Confirmed),
            booking(4, 1, "2024-05-14T13:00:00Z", BookingStatus::Cancelled),
        ];
        assert_eq!(
            booking_counts(&bookings),
            BookingCounts {
                pending: 1,
                confirmed: 2,
                cancelled: 1,
                completed: 0,
            }
        );
    }

    #[test]
    fn display_helpers_fall_back_to_raw_values() {
        assert_eq!(format_day("2024-05-14T10:00:00Z"), "Tue 14 May 2024");
        assert_eq!(format_day("not a date"), "not a date");
        assert_eq!(
            format_time_range("2024-05-14T10:00:00Z", Some("2024-05-14T10:30:00Z")),
            "10:00 – 10:30"
        );
        assert_eq!(format_time_range("2024-05-14T10:00:00Z", None), "10:00");
    }
}
