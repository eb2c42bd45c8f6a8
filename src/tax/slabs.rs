use rust_decimal::Decimal;
use serde::Serialize;

/// One marginal-rate bracket. `upper: None` means the bracket is unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slab {
    pub upper: Option<Decimal>,
    pub rate: Decimal,
}

/// Ordered bracket table for a regime
#[derive(Debug, Clone, Copy)]
pub struct SlabTable {
    pub name: &'static str,
    slabs: &'static [Slab],
}

/// Portion of taxable income that fell into a single slab
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlabSlice {
    pub lower: Decimal,
    pub upper: Option<Decimal>,
    pub taxed_amount: Decimal,
    pub rate: Decimal,
    pub tax: Decimal,
}

const fn amount(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 0)
}

const fn percent(value: u32) -> Decimal {
    Decimal::from_parts(value, 0, 0, false, 2)
}

const fn bounded(upper: u32, rate_pct: u32) -> Slab {
    Slab {
        upper: Some(amount(upper)),
        rate: percent(rate_pct),
    }
}

const fn unbounded(rate_pct: u32) -> Slab {
    Slab {
        upper: None,
        rate: percent(rate_pct),
    }
}

/// Legacy regime: 0% / 5% / 20% / 30%
pub static OLD_REGIME_SLABS: SlabTable = SlabTable {
    name: "old",
    slabs: &[
        bounded(250_000, 0),
        bounded(500_000, 5),
        bounded(1_000_000, 20),
        unbounded(30),
    ],
};

/// Simplified regime: 0% / 5% / 10% / 15% / 20% / 30%
pub static NEW_REGIME_SLABS: SlabTable = SlabTable {
    name: "new",
    slabs: &[
        bounded(300_000, 0),
        bounded(600_000, 5),
        bounded(900_000, 10),
        bounded(1_200_000, 15),
        bounded(1_500_000, 20),
        unbounded(30),
    ],
};

impl SlabTable {
    /// Build a table from ascending slabs.
    ///
    /// Slabs after the first unbounded one are never reached.
    pub const fn new(name: &'static str, slabs: &'static [Slab]) -> Self {
        Self { name, slabs }
    }

    pub fn slabs(&self) -> &'static [Slab] {
        self.slabs
    }

    /// Split taxable income into per-slab slices.
    ///
    /// Walks the slabs in order: while income exceeds a slab's upper bound the
    /// whole slab is taxed and the walk continues; the slab containing the
    /// income is taxed on the remainder only and ends the walk. Income equal
    /// to an upper bound stays inside that slab.
    pub fn breakdown(&self, taxable_income: Decimal) -> Vec<SlabSlice> {
        let taxable_income = taxable_income.max(Decimal::ZERO);
        let mut slices = Vec::with_capacity(self.slabs.len());
        let mut lower = Decimal::ZERO;

        for slab in self.slabs {
            match slab.upper {
                Some(upper) if taxable_income > upper => {
                    slices.push(SlabSlice::new(lower, slab.upper, upper - lower, slab.rate));
                    lower = upper;
                }
                _ => {
                    slices.push(SlabSlice::new(
                        lower,
                        slab.upper,
                        taxable_income - lower,
                        slab.rate,
                    ));
                    break;
                }
            }
        }

        slices
    }

    /// Tax due on `taxable_income` before cess
    pub fn tax_on(&self, taxable_income: Decimal) -> Decimal {
        self.breakdown(taxable_income).iter().map(|s| s.tax).sum()
    }
}

impl SlabSlice {
    fn new(lower: Decimal, upper: Option<Decimal>, taxed_amount: Decimal, rate: Decimal) -> Self {
        Self {
            lower,
            upper,
            taxed_amount,
            rate,
            tax: taxed_amount * rate,
        }
    }
}
