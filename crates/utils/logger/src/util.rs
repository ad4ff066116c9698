use time::UtcOffset;

/// Build a [`UtcOffset`] from a whole-hour offset.
///
/// # Examples
///
/// ```
/// use logger::utc_offset_hours;
///
/// let seoul = utc_offset_hours(9);   // UTC+9
/// let utc = utc_offset_hours(0);
/// ```
pub fn utc_offset_hours(hours: i8) -> UtcOffset {
    UtcOffset::from_hms(hours, 0, 0).expect("Invalid UTC offset hours")
}

/// Build a [`UtcOffset`] from hours, minutes and seconds.
///
/// # Examples
///
/// ```
/// use logger::utc_offset_hms;
///
/// let india = utc_offset_hms(5, 30, 0);  // UTC+5:30
/// ```
pub fn utc_offset_hms(hours: i8, minutes: i8, seconds: i8) -> UtcOffset {
    UtcOffset::from_hms(hours, minutes, seconds).expect("Invalid UTC offset")
}
