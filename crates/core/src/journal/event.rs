//! Classified asset-movement events, the engine's inbound contract.

use chrono::{DateTime, NaiveDate, Utc};
use costbook_shared::types::{AssetSymbol, SourceEventId, TenantId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::JournalError;

/// Quantity of one asset and its total value in reporting currency.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetLeg {
    /// Asset moved.
    pub asset: AssetSymbol,
    /// Units moved.
    pub quantity: Decimal,
    /// Total fair value of the units, reporting currency.
    pub value: Decimal,
}

impl AssetLeg {
    /// Creates a leg.
    #[must_use]
    pub fn new(asset: impl Into<AssetSymbol>, quantity: Decimal, value: Decimal) -> Self {
        Self {
            asset: asset.into(),
            quantity,
            value,
        }
    }
}

/// Fee paid for a movement. Fees never consume lots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fee {
    /// Asset the fee was paid in.
    pub asset: AssetSymbol,
    /// Units paid.
    pub quantity: Decimal,
    /// Value of the fee, reporting currency.
    pub value: Decimal,
}

/// What happened to the tenant's holdings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MovementKind {
    /// Bought with fiat.
    Acquisition {
        /// Units bought and their cost.
        leg: AssetLeg,
    },
    /// Sold for fiat.
    Disposal {
        /// Units sold and the proceeds.
        leg: AssetLeg,
    },
    /// Exchanged one asset for another.
    Swap {
        /// Units given up.
        outgoing: AssetLeg,
        /// Units received; their value is the proceeds of the outgoing leg.
        incoming: AssetLeg,
    },
    /// Received as income (staking, airdrop, mining).
    Reward {
        /// Units received and their fair value.
        leg: AssetLeg,
    },
    /// Locked for staking; ownership unchanged.
    Stake {
        /// Units staked.
        leg: AssetLeg,
    },
    /// Released from staking; ownership unchanged.
    Unstake {
        /// Units released.
        leg: AssetLeg,
    },
}

impl MovementKind {
    /// Short lowercase name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Acquisition { .. } => "acquisition",
            Self::Disposal { .. } => "disposal",
            Self::Swap { .. } => "swap",
            Self::Reward { .. } => "reward",
            Self::Stake { .. } => "stake",
            Self::Unstake { .. } => "unstake",
        }
    }

    /// The leg that creates a lot, if any.
    #[must_use]
    pub fn acquired_leg(&self) -> Option<&AssetLeg> {
        match self {
            Self::Acquisition { leg } | Self::Reward { leg } => Some(leg),
            Self::Swap { incoming, .. } => Some(incoming),
            Self::Disposal { .. } | Self::Stake { .. } | Self::Unstake { .. } => None,
        }
    }

    /// The leg that consumes lots, if any.
    #[must_use]
    pub fn disposed_leg(&self) -> Option<&AssetLeg> {
        match self {
            Self::Disposal { leg } => Some(leg),
            Self::Swap { outgoing, .. } => Some(outgoing),
            Self::Acquisition { .. }
            | Self::Reward { .. }
            | Self::Stake { .. }
            | Self::Unstake { .. } => None,
        }
    }

    /// Proceeds of the disposed leg.
    #[must_use]
    pub fn proceeds(&self) -> Option<Decimal> {
        match self {
            Self::Disposal { leg } => Some(leg.value),
            Self::Swap { incoming, .. } => Some(incoming.value),
            Self::Acquisition { .. }
            | Self::Reward { .. }
            | Self::Stake { .. }
            | Self::Unstake { .. } => None,
        }
    }

    /// Every leg of the movement.
    #[must_use]
    pub fn legs(&self) -> Vec<&AssetLeg> {
        match self {
            Self::Acquisition { leg }
            | Self::Disposal { leg }
            | Self::Reward { leg }
            | Self::Stake { leg }
            | Self::Unstake { leg } => vec![leg],
            Self::Swap { outgoing, incoming } => vec![outgoing, incoming],
        }
    }
}

/// A classified movement handed to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovementEvent {
    /// Owning tenant, already validated upstream.
    pub tenant_id: TenantId,
    /// Idempotency key.
    pub source_event_id: SourceEventId,
    /// When the movement happened.
    pub occurred_at: DateTime<Utc>,
    /// What happened.
    pub kind: MovementKind,
    /// Fee paid, if any.
    #[serde(default)]
    pub fee: Option<Fee>,
}

impl MovementEvent {
    /// Calendar date the entry is booked on.
    #[must_use]
    pub fn date(&self) -> NaiveDate {
        self.occurred_at.date_naive()
    }

    /// Assets whose lots this event changes, sorted and deduplicated.
    #[must_use]
    pub fn lot_assets(&self) -> Vec<AssetSymbol> {
        let mut assets: Vec<AssetSymbol> = self
            .kind
            .acquired_leg()
            .into_iter()
            .chain(self.kind.disposed_leg())
            .map(|leg| leg.asset.clone())
            .collect();
        assets.sort();
        assets.dedup();
        assets
    }

    /// Returns true if the event changes lots of `asset`.
    #[must_use]
    pub fn touches_lots_of(&self, asset: &AssetSymbol) -> bool {
        self.kind.acquired_leg().is_some_and(|leg| &leg.asset == asset)
            || self.kind.disposed_leg().is_some_and(|leg| &leg.asset == asset)
    }

    /// Human-readable entry description.
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.kind {
            MovementKind::Acquisition { leg } => {
                format!("Acquisition of {} {}", leg.quantity, leg.asset)
            }
            MovementKind::Disposal { leg } => format!("Disposal of {} {}", leg.quantity, leg.asset),
            MovementKind::Swap { outgoing, incoming } => format!(
                "Swap of {} {} for {} {}",
                outgoing.quantity, outgoing.asset, incoming.quantity, incoming.asset
            ),
            MovementKind::Reward { leg } => format!("Reward of {} {}", leg.quantity, leg.asset),
            MovementKind::Stake { leg } => format!("Stake of {} {}", leg.quantity, leg.asset),
            MovementKind::Unstake { leg } => format!("Unstake of {} {}", leg.quantity, leg.asset),
        }
    }

    /// Rejects negative figures and structurally unusable events.
    pub fn validate(&self) -> Result<(), JournalError> {
        if self.source_event_id.as_str().trim().is_empty() {
            return Err(JournalError::InvalidEvent(
                "source event id is empty".to_string(),
            ));
        }

        for leg in self.kind.legs() {
            check_leg(&leg.asset, leg.quantity, leg.value)?;
        }
        if let Some(fee) = &self.fee {
            check_leg(&fee.asset, fee.quantity, fee.value)?;
        }

        if let MovementKind::Swap { outgoing, incoming } = &self.kind
            && outgoing.asset == incoming.asset
        {
            return Err(JournalError::InvalidEvent(format!(
                "swap must exchange two different assets, got {} on both legs",
                outgoing.asset
            )));
        }

        Ok(())
    }
}

fn is_negative(value: Decimal) -> bool {
    value.is_sign_negative() && !value.is_zero()
}

fn check_leg(asset: &AssetSymbol, quantity: Decimal, value: Decimal) -> Result<(), JournalError> {
    if asset.as_str().is_empty() {
        return Err(JournalError::InvalidEvent("asset symbol is empty".to_string()));
    }
    if is_negative(quantity) {
        return Err(JournalError::InvalidQuantity(quantity));
    }
    if is_negative(value) {
        return Err(JournalError::InvalidAmount(value));
    }
    Ok(())
}

/// An event as stored in the tenant's event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedEvent {
    /// Arrival sequence assigned by the repository.
    pub sequence: u64,
    /// The event.
    pub event: MovementEvent,
}

impl RecordedEvent {
    /// Replay order: occurrence time, then arrival.
    #[must_use]
    pub fn replay_key(&self) -> (DateTime<Utc>, u64) {
        (self.event.occurred_at, self.sequence)
    }
}
