// src/domain/card.rs
//
// Card Entity (loyalty card, "tessera")
//
// Links a user to one cinema. Valid through its renewal date; renewing
// always extends by one year from the later of today and the current
// renewal date.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,

    /// Card holder (a User account)
    pub account_id: Uuid,

    pub cinema_id: Uuid,

    /// Registrar who issued the card
    pub registered_by: Uuid,

    pub issued_on: NaiveDate,

    /// Last day the card is valid
    pub renewal_date: NaiveDate,
}

impl Card {
    pub fn issue(
        account_id: Uuid,
        cinema_id: Uuid,
        registered_by: Uuid,
        today: NaiveDate,
    ) -> DomainResult<Self> {
        Ok(Self {
            id: Uuid::new_v4(),
            account_id,
            cinema_id,
            registered_by,
            issued_on: today,
            renewal_date: one_year_after(today)?,
        })
    }

    pub fn renew(&mut self, today: NaiveDate) -> DomainResult<()> {
        let base = self.renewal_date.max(today);
        self.renewal_date = one_year_after(base)?;
        Ok(())
    }

    pub fn is_expired(&self, today: NaiveDate) -> bool {
        today > self.renewal_date
    }
}

/// Feb 29 clamps to Feb 28 in non-leap years
fn one_year_after(date: NaiveDate) -> DomainResult<NaiveDate> {
    date.checked_add_months(Months::new(12)).ok_or_else(|| {
        DomainError::InvariantViolation(format!("Date {} cannot be extended by a year", date))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn card(today: NaiveDate) -> Card {
        Card::issue(Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4(), today).unwrap()
    }

    #[test]
    fn test_issue_sets_one_year_validity() {
        let c = card(date(2026, 3, 15));
        assert_eq!(c.renewal_date, date(2027, 3, 15));
        assert!(!c.is_expired(date(2027, 3, 15)));
        assert!(c.is_expired(date(2027, 3, 16)));
    }

    #[test]
    fn test_early_renewal_extends_from_current_date() {
        let mut c = card(date(2026, 3, 15));
        c.renew(date(2026, 10, 1)).unwrap();
        assert_eq!(c.renewal_date, date(2028, 3, 15));
    }

    #[test]
    fn test_late_renewal_extends_from_today() {
        let mut c = card(date(2020, 1, 10));
        c.renew(date(2026, 10, 17)).unwrap();
        assert_eq!(c.renewal_date, date(2027, 10, 17));
    }

    #[test]
    fn test_leap_day_clamps() {
        let c = card(date(2028, 2, 29));
        assert_eq!(c.renewal_date, date(2029, 2, 28));
    }
}
