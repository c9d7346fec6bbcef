//! In-memory, FIFO-ordered collection of the lots of one asset.

use costbook_shared::types::LotId;
use rust_decimal::Decimal;

use super::error::LotError;
use super::types::{AcquisitionLot, LotReduction};

/// Lots of a single (tenant, asset) pair, kept oldest first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LotBook {
    lots: Vec<AcquisitionLot>,
}

impl LotBook {
    /// Builds a book from lots in any order.
    #[must_use]
    pub fn from_lots(mut lots: Vec<AcquisitionLot>) -> Self {
        lots.sort_by_key(AcquisitionLot::fifo_key);
        Self { lots }
    }

    /// Inserts a lot at its FIFO position.
    pub fn insert(&mut self, lot: AcquisitionLot) {
        let key = lot.fifo_key();
        let at = self.lots.partition_point(|l| l.fifo_key() <= key);
        self.lots.insert(at, lot);
    }

    /// All lots, oldest first.
    #[must_use]
    pub fn lots(&self) -> &[AcquisitionLot] {
        &self.lots
    }

    /// Consumes the book.
    #[must_use]
    pub fn into_lots(self) -> Vec<AcquisitionLot> {
        self.lots
    }

    /// Finds a lot by id.
    #[must_use]
    pub fn get(&self, lot_id: LotId) -> Option<&AcquisitionLot> {
        self.lots.iter().find(|lot| lot.id == lot_id)
    }

    /// Reduces one lot.
    pub fn reduce(&mut self, lot_id: LotId, quantity: Decimal) -> Result<(), LotError> {
        self.lots
            .iter_mut()
            .find(|lot| lot.id == lot_id)
            .ok_or(LotError::LotNotFound(lot_id))?
            .reduce(quantity)
    }

    /// Applies every reduction or none of them.
    pub fn apply(&mut self, reductions: &[LotReduction]) -> Result<(), LotError> {
        let mut next = self.lots.clone();
        for reduction in reductions {
            next.iter_mut()
                .find(|lot| lot.id == reduction.lot_id)
                .ok_or(LotError::LotNotFound(reduction.lot_id))?
                .reduce(reduction.quantity)?;
        }
        self.lots = next;
        Ok(())
    }
}
