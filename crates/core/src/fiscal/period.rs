//! Fiscal year types and posting rules.

use chrono::NaiveDate;
use costbook_shared::types::{FiscalYearId, TenantId};
use serde::{Deserialize, Serialize};

/// Fiscal year definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FiscalYear {
    /// Unique identifier.
    pub id: FiscalYearId,
    /// Tenant this fiscal year belongs to.
    pub tenant_id: TenantId,
    /// Year name (e.g., "FY2026").
    pub name: String,
    /// Start date of the fiscal year.
    pub start_date: NaiveDate,
    /// End date of the fiscal year (inclusive).
    pub end_date: NaiveDate,
    /// Closed years accept no new entries.
    pub is_closed: bool,
}

impl FiscalYear {
    /// Creates an open fiscal year.
    #[must_use]
    pub fn open(
        tenant_id: TenantId,
        name: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            id: FiscalYearId::new(),
            tenant_id,
            name: name.into(),
            start_date,
            end_date,
            is_closed: false,
        }
    }

    /// Returns true if the given date falls within this year.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        date >= self.start_date && date <= self.end_date
    }

    /// Returns true if entries dated `date` may be booked into this year.
    #[must_use]
    pub fn allows_posting_on(&self, date: NaiveDate) -> bool {
        !self.is_closed && self.contains_date(date)
    }
}

/// Finds the open fiscal year covering a date.
#[must_use]
pub fn find_open_year(years: &[FiscalYear], date: NaiveDate) -> Option<&FiscalYear> {
    years.iter().find(|year| year.allows_posting_on(date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn fy2025(tenant: TenantId) -> FiscalYear {
        FiscalYear::open(tenant, "FY2025", date(2025, 1, 1), date(2025, 12, 31))
    }

    #[rstest]
    #[case(date(2025, 1, 1), true)]
    #[case(date(2025, 6, 15), true)]
    #[case(date(2025, 12, 31), true)]
    #[case(date(2024, 12, 31), false)]
    #[case(date(2026, 1, 1), false)]
    fn test_contains_date_is_inclusive(#[case] day: NaiveDate, #[case] expected: bool) {
        assert_eq!(fy2025(TenantId::new()).contains_date(day), expected);
    }

    #[test]
    fn test_closed_year_rejects_posting() {
        let mut year = fy2025(TenantId::new());
        year.is_closed = true;
        assert!(year.contains_date(date(2025, 3, 1)));
        assert!(!year.allows_posting_on(date(2025, 3, 1)));
    }

    #[test]
    fn test_find_open_year() {
        let tenant = TenantId::new();
        let mut closed = FiscalYear::open(tenant, "FY2024", date(2024, 1, 1), date(2024, 12, 31));
        closed.is_closed = true;
        let years = vec![closed, fy2025(tenant)];

        assert_eq!(
            find_open_year(&years, date(2025, 5, 5)).map(|y| y.name.as_str()),
            Some("FY2025")
        );
        assert!(find_open_year(&years, date(2024, 5, 5)).is_none());
        assert!(find_open_year(&years, date(2023, 5, 5)).is_none());
    }
}
