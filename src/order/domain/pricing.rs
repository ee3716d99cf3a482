//! Line items, money amounts, and the order financial summary.

use super::{FulfillmentMode, OrderDomainError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Monetary amount in minor currency units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(u64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units.
    #[must_use]
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Returns the amount in minor units.
    #[must_use]
    pub const fn cents(self) -> u64 {
        self.0
    }

    /// Adds two amounts.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::AmountOverflow`] on overflow.
    pub const fn checked_add(self, other: Self) -> Result<Self, OrderDomainError> {
        match self.0.checked_add(other.0) {
            Some(sum) => Ok(Self(sum)),
            None => Err(OrderDomainError::AmountOverflow),
        }
    }

    /// Multiplies the amount by a quantity.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::AmountOverflow`] on overflow.
    pub const fn checked_mul(self, quantity: u32) -> Result<Self, OrderDomainError> {
        match self.0.checked_mul(quantity as u64) {
            Some(product) => Ok(Self(product)),
            None => Err(OrderDomainError::AmountOverflow),
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{:02}",
            self.0.div_euclid(100),
            self.0.rem_euclid(100)
        )
    }
}

/// Tax rate expressed in basis points (1/100 of a percent).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaxRate(u32);

impl TaxRate {
    const BASIS_POINTS_PER_UNIT: u128 = 10_000;

    /// Creates a tax rate from basis points, e.g. `825` for 8.25%.
    #[must_use]
    pub const fn from_basis_points(basis_points: u32) -> Self {
        Self(basis_points)
    }

    /// Returns the rate in basis points.
    #[must_use]
    pub const fn basis_points(self) -> u32 {
        self.0
    }

    /// Computes tax on `amount`, rounded half-up to the nearest cent.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::AmountOverflow`] when the tax does not fit
    /// in a [`Money`] value.
    pub fn apply(self, amount: Money) -> Result<Money, OrderDomainError> {
        let scaled = u128::from(amount.cents()) * u128::from(self.0);
        let half = Self::BASIS_POINTS_PER_UNIT.div_euclid(2);
        let rounded = (scaled + half).div_euclid(Self::BASIS_POINTS_PER_UNIT);
        u64::try_from(rounded)
            .map(Money::from_cents)
            .map_err(|_| OrderDomainError::AmountOverflow)
    }
}

/// One line of an order as captured at checkout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    name: String,
    size: Option<String>,
    unit_price: Money,
    quantity: u32,
}

impl LineItem {
    /// Creates a validated line item.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::EmptyItemName`] for a blank name and
    /// [`OrderDomainError::InvalidQuantity`] for a zero quantity.
    pub fn new(
        name: impl Into<String>,
        unit_price: Money,
        quantity: u32,
    ) -> Result<Self, OrderDomainError> {
        let raw_name = name.into();
        let trimmed = raw_name.trim();
        if trimmed.is_empty() {
            return Err(OrderDomainError::EmptyItemName);
        }
        if quantity == 0 {
            return Err(OrderDomainError::InvalidQuantity(trimmed.to_owned()));
        }
        Ok(Self {
            name: trimmed.to_owned(),
            size: None,
            unit_price,
            quantity,
        })
    }

    /// Sets the portion size, ignoring blank values.
    #[must_use]
    pub fn with_size(mut self, size: impl Into<String>) -> Self {
        let value = size.into();
        let trimmed = value.trim();
        self.size = (!trimmed.is_empty()).then(|| trimmed.to_owned());
        self
    }

    /// Returns the item name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the portion size, if any.
    #[must_use]
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Returns the price of a single unit.
    #[must_use]
    pub const fn unit_price(&self) -> Money {
        self.unit_price
    }

    /// Returns the ordered quantity.
    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `unit_price * quantity`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::AmountOverflow`] on overflow.
    pub const fn line_total(&self) -> Result<Money, OrderDomainError> {
        self.unit_price.checked_mul(self.quantity)
    }
}

/// Financial summary computed once when the order is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Financials {
    subtotal: Money,
    tax_rate: TaxRate,
    tax_amount: Money,
    delivery_fee: Option<Money>,
    total: Money,
}

impl Financials {
    /// Computes the summary for `items`.
    ///
    /// The delivery fee only contributes to the total for delivery orders.
    ///
    /// # Errors
    ///
    /// Returns [`OrderDomainError::DeliveryDataOnPickup`] when a fee is given
    /// for a pickup order, or [`OrderDomainError::AmountOverflow`].
    pub fn compute(
        items: &[LineItem],
        tax_rate: TaxRate,
        mode: FulfillmentMode,
        delivery_fee: Option<Money>,
    ) -> Result<Self, OrderDomainError> {
        if mode == FulfillmentMode::Pickup && delivery_fee.is_some() {
            return Err(OrderDomainError::DeliveryDataOnPickup);
        }

        let subtotal = items.iter().try_fold(Money::ZERO, |acc, item| {
            acc.checked_add(item.line_total()?)
        })?;
        let tax_amount = tax_rate.apply(subtotal)?;
        let fee = delivery_fee.unwrap_or(Money::ZERO);
        let total = subtotal.checked_add(tax_amount)?.checked_add(fee)?;

        Ok(Self {
            subtotal,
            tax_rate,
            tax_amount,
            delivery_fee,
            total,
        })
    }

    /// Returns the sum of line totals.
    #[must_use]
    pub const fn subtotal(&self) -> Money {
        self.subtotal
    }

    /// Returns the tax rate.
    #[must_use]
    pub const fn tax_rate(&self) -> TaxRate {
        self.tax_rate
    }

    /// Returns the tax charged.
    #[must_use]
    pub const fn tax_amount(&self) -> Money {
        self.tax_amount
    }

    /// Returns the delivery fee, if any.
    #[must_use]
    pub const fn delivery_fee(&self) -> Option<Money> {
        self.delivery_fee
    }

    /// Returns the total charged.
    #[must_use]
    pub const fn total(&self) -> Money {
        self.total
    }
}
