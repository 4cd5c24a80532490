/// A calendar date, the language's DATE type.
///
/// Fields are declared year-month-day so the derived ordering is the
/// lexicographic (year, month, day) order dates compare by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Date {
    year:  u16,
    month: u8,
    day:   u8,
}

/// Error returned when a `d/m/y` string does not describe a valid date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseDateError;

impl Date {
    /// The date used for zero-initialized DATE variables.
    pub const EPOCH: Self = Self { year: 1970, month: 1, day: 1 };

    /// Creates a date, validating the day against the month's length.
    ///
    /// Months are `1..=12`; days are `1..=days_in(month, year)` with the
    /// Gregorian leap rule. Returns `None` for anything else.
    ///
    /// ## Example
    /// ```
    /// use pcse::interpreter::value::date::Date;
    ///
    /// assert!(Date::new(31, 12, 2020).is_some());
    /// assert!(Date::new(29, 2, 2020).is_some()); // leap year
    /// assert!(Date::new(29, 2, 2019).is_none());
    /// assert!(Date::new(0, 1, 2019).is_none());
    /// ```
    #[must_use]
    pub const fn new(day: u8, month: u8, year: u16) -> Option<Self> {
        if month < 1 || month > 12 {
            return None;
        }
        if day < 1 || day > Self::days_in(month, year) {
            return None;
        }
        Some(Self { year, month, day })
    }

    /// The day of the month, `1..=31`.
    #[must_use]
    pub const fn day(&self) -> u8 {
        self.day
    }

    /// The month, `1..=12`.
    #[must_use]
    pub const fn month(&self) -> u8 {
        self.month
    }

    /// The year, `0..=65535`.
    #[must_use]
    pub const fn year(&self) -> u16 {
        self.year
    }

    /// Gregorian leap rule: divisible by 4, except centuries not divisible
    /// by 400.
    #[must_use]
    pub const fn is_leap_year(year: u16) -> bool {
        year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
    }

    /// Number of days in the given month of the given year.
    #[must_use]
    pub const fn days_in(month: u8, year: u16) -> u8 {
        match month {
            2 => {
                if Self::is_leap_year(year) { 29 } else { 28 }
            },
            4 | 6 | 9 | 11 => 30,
            _ => 31,
        }
    }
}

impl std::fmt::Display for Date {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.day, self.month, self.year)
    }
}

impl std::str::FromStr for Date {
    type Err = ParseDateError;

    /// Parses a `d/m/y` date such as `21/11/2019`.
    ///
    /// ## Example
    /// ```
    /// use pcse::interpreter::value::date::Date;
    ///
    /// let date: Date = "21/11/2019".parse().unwrap();
    /// assert_eq!(date.day(), 21);
    /// assert!("30/2/2019".parse::<Date>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.split('/');
        let day = parse_field(parts.next())?;
        let month = parse_field(parts.next())?;
        let year = parse_field(parts.next())?;
        if parts.next().is_some() {
            return Err(ParseDateError);
        }
        Self::new(crate::util::num::i64_to_u8_checked(day, ParseDateError)?,
                  crate::util::num::i64_to_u8_checked(month, ParseDateError)?,
                  crate::util::num::i64_to_u16_checked(year, ParseDateError)?).ok_or(ParseDateError)
    }
}

fn parse_field(part: Option<&str>) -> Result<i64, ParseDateError> {
    part.ok_or(ParseDateError)?.trim().parse().map_err(|_| ParseDateError)
}

impl std::fmt::Display for ParseDateError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid date")
    }
}

impl std::error::Error for ParseDateError {}
