//! Catalogue of packages and the investments made in them.

use dashmap::DashMap;
use rust_decimal::Decimal;

use prestige_shared::types::{AccountId, InvestmentId, PackageId};

use crate::error::LedgerError;

use super::package::{Investment, InvestmentPackage, InvestmentStatus};

/// In-memory package catalogue and investment register.
#[derive(Debug, Default)]
pub struct InvestmentBook {
    packages: DashMap<PackageId, InvestmentPackage>,
    investments: DashMap<InvestmentId, Investment>,
}

impl InvestmentBook {
    /// Creates an empty book.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Lists a new package.
    pub fn add_package(
        &self,
        name: impl Into<String>,
        min_amount: Decimal,
        max_amount: Decimal,
        duration_days: u32,
        roi_percentage: Decimal,
    ) -> InvestmentPackage {
        let package = InvestmentPackage {
            id: PackageId::new(),
            name: name.into(),
            min_amount,
            max_amount,
            duration_days,
            roi_percentage,
        };
        self.packages.insert(package.id, package.clone());
        package
    }

    /// Returns the package.
    pub fn package(&self, package_id: PackageId) -> Result<InvestmentPackage, LedgerError> {
        self.packages
            .get(&package_id)
            .map(|entry| entry.value().clone())
            .ok_or(LedgerError::PackageNotFound(package_id))
    }

    /// Returns every package, cheapest first.
    #[must_use]
    pub fn packages(&self) -> Vec<InvestmentPackage> {
        let mut packages: Vec<InvestmentPackage> =
            self.packages.iter().map(|entry| entry.value().clone()).collect();
        packages.sort_by(|a, b| a.min_amount.cmp(&b.min_amount).then_with(|| a.name.cmp(&b.name)));
        packages
    }

    pub(crate) fn insert(&self, investment: Investment) {
        self.investments.insert(investment.id, investment);
    }

    /// Returns the investment.
    #[must_use]
    pub fn get(&self, investment_id: InvestmentId) -> Option<Investment> {
        self.investments
            .get(&investment_id)
            .map(|entry| entry.value().clone())
    }

    /// Returns the account's investments, most recent term first.
    #[must_use]
    pub fn for_account(&self, account_id: AccountId) -> Vec<Investment> {
        let mut investments: Vec<Investment> = self
            .investments
            .iter()
            .filter(|entry| entry.value().account_id == account_id)
            .map(|entry| entry.value().clone())
            .collect();
        investments.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        investments
    }

    /// Returns true if the account has an investment still running.
    #[must_use]
    pub fn has_active(&self, account_id: AccountId) -> bool {
        self.investments.iter().any(|entry| {
            entry.value().account_id == account_id
                && entry.value().status == InvestmentStatus::Active
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_packages_sorted_by_minimum() {
        let book = InvestmentBook::new();
        book.add_package("Gold", dec!(1000), dec!(10000), 90, dec!(15));
        book.add_package("Starter", dec!(100), dec!(999), 30, dec!(5));

        let names: Vec<_> = book.packages().into_iter().map(|p| p.name).collect();
        assert_eq!(names, ["Starter", "Gold"]);
    }

    #[test]
    fn test_unknown_package() {
        let book = InvestmentBook::new();
        let missing = PackageId::new();
        assert!(matches!(
            book.package(missing),
            Err(LedgerError::PackageNotFound(id)) if id == missing
        ));
    }
}
