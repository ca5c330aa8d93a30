//! # Message Router
//!
//! Classifies inbound messages by exact address and applies them to the
//! pose store.
//!
//! ## Dispatch
//!
//! ```text
//! InboundMessage ──► RoutingTable lookup ──┬─ Route { hand, Position }    ─► extract 3 ─► convert ─► store
//!                                          ├─ Route { hand, Orientation } ─► extract 4 ─► convert ─► store
//!                                          └─ (no route)                  ─► fallback diagnostic
//! ```
//!
//! A recognized address with the wrong argument shape is Malformed: it
//! gets a diagnostic and leaves the store untouched.
//!
//! ## Drain Contract
//!
//! - Processes exactly what the source had buffered when the drain began
//! - Strict arrival order, later writes overwrite earlier ones
//! - Never blocks, never panics

mod fallback;

pub use fallback::{format_message, FALLBACK_TARGET};

use std::collections::HashMap;
use std::collections::VecDeque;
use std::fmt;

use handosc_core::{convert_orientation, convert_position, Hand, PoseStore, Quaternion, Vec3};

use crate::protocol::InboundMessage;

/// Which field group of a pose a route writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PoseField {
    /// `(x, y, z)` position.
    Position,
    /// `(w, x, y, z)` orientation.
    Orientation,
}

impl PoseField {
    /// Number of numeric arguments a message for this field must carry.
    #[must_use]
    pub const fn arity(self) -> usize {
        match self {
            PoseField::Position => 3,
            PoseField::Orientation => 4,
        }
    }

    /// Lowercase name as it appears in message addresses.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            PoseField::Position => "position",
            PoseField::Orientation => "orientation",
        }
    }
}

/// Handler contract for one address: which hand and which field group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Route {
    /// Hand the message updates, chosen by address only.
    pub hand: Hand,
    /// Field group the message replaces.
    pub field: PoseField,
}

impl Route {
    /// Creates a route.
    #[must_use]
    pub const fn new(hand: Hand, field: PoseField) -> Self {
        Self { hand, field }
    }

    /// The canonical `/hand/<side>/<field>` address for this route.
    #[must_use]
    pub fn canonical_address(self) -> String {
        format!("/hand/{}/{}", self.hand.as_str(), self.field.as_str())
    }
}

/// Exact-match mapping from address literal to [`Route`].
///
/// Addresses are compared byte for byte; no OSC pattern matching.
#[derive(Clone, Debug)]
pub struct RoutingTable {
    routes: HashMap<String, Route>,
}

impl RoutingTable {
    /// An empty table: every message falls through to the fallback.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            routes: HashMap::new(),
        }
    }

    /// The four `/hand/{left,right}/{position,orientation}` routes.
    #[must_use]
    pub fn hands() -> Self {
        let mut table = Self::empty();
        for hand in Hand::ALL {
            for field in [PoseField::Position, PoseField::Orientation] {
                let route = Route::new(hand, field);
                table.routes.insert(route.canonical_address(), route);
            }
        }
        table
    }

    /// Adds (or replaces) a route for an extra address.
    #[must_use]
    pub fn with_route(mut self, address: impl Into<String>, route: Route) -> Self {
        self.routes.insert(address.into(), route);
        self
    }

    /// Looks up the route for an address.
    #[inline]
    #[must_use]
    pub fn lookup(&self, address: &str) -> Option<Route> {
        self.routes.get(address).copied()
    }

    /// Number of routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    /// True if the table has no routes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl Default for RoutingTable {
    fn default() -> Self {
        Self::hands()
    }
}

/// Why a recognized address was not applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MalformedReason {
    /// Argument count differs from the route's arity.
    WrongArity {
        /// Count the route requires.
        expected: usize,
        /// Count the message carried.
        found: usize,
    },
    /// An argument was not `i32`, `f32`, `i64` or `f64`.
    NonNumericArgument {
        /// Zero-based argument index.
        index: usize,
        /// Type name of the offending argument.
        found: &'static str,
    },
    /// A numeric argument was NaN or infinite.
    NonFiniteArgument {
        /// Zero-based argument index.
        index: usize,
    },
}

impl fmt::Display for MalformedReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedReason::WrongArity { expected, found } => {
                write!(f, "expected {expected} numeric arguments, found {found}")
            }
            MalformedReason::NonNumericArgument { index, found } => {
                write!(f, "argument {index} is {found}, expected a number")
            }
            MalformedReason::NonFiniteArgument { index } => {
                write!(f, "argument {index} is not finite")
            }
        }
    }
}

/// Result of routing one message.
#[derive(Clone, Debug, PartialEq)]
pub enum RouteOutcome {
    /// A hand position was replaced.
    PositionUpdated {
        /// Hand that changed.
        hand: Hand,
        /// New renderer-space position.
        position: Vec3,
    },
    /// A hand orientation was replaced.
    OrientationUpdated {
        /// Hand that changed.
        hand: Hand,
        /// New renderer-space orientation.
        orientation: Quaternion,
    },
    /// Recognized address, unusable arguments. Store untouched.
    Malformed {
        /// The route the address matched.
        route: Route,
        /// What was wrong.
        reason: MalformedReason,
        /// Fallback rendering of the message.
        diagnostic: String,
    },
    /// Address not in the routing table. Store untouched.
    Unrecognized {
        /// Fallback rendering of the message.
        diagnostic: String,
    },
}

impl RouteOutcome {
    /// True if the pose store changed.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(
            self,
            RouteOutcome::PositionUpdated { .. } | RouteOutcome::OrientationUpdated { .. }
        )
    }

    /// The diagnostic line, for outcomes that carry one.
    #[must_use]
    pub fn diagnostic(&self) -> Option<&str> {
        match self {
            RouteOutcome::Malformed { diagnostic, .. } | RouteOutcome::Unrecognized { diagnostic } => {
                Some(diagnostic)
            }
            _ => None,
        }
    }
}

/// Anything that buffers inbound messages for the router to drain.
pub trait MessageSource {
    /// Collects whatever the transport has ready and returns how many
    /// messages are now buffered. A drain processes at most this many.
    fn poll_pending(&mut self) -> usize;

    /// Pops the oldest buffered message.
    fn next_message(&mut self) -> Option<InboundMessage>;
}

impl MessageSource for VecDeque<InboundMessage> {
    fn poll_pending(&mut self) -> usize {
        self.len()
    }

    fn next_message(&mut self) -> Option<InboundMessage> {
        self.pop_front()
    }
}

/// Counts of what a drain did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DrainReport {
    /// Messages taken from the source.
    pub drained: u64,
    /// Position writes.
    pub positions: u64,
    /// Orientation writes.
    pub orientations: u64,
    /// Recognized addresses with unusable arguments.
    pub malformed: u64,
    /// Addresses with no route.
    pub unrecognized: u64,
}

impl DrainReport {
    /// Counts one outcome.
    pub fn record(&mut self, outcome: &RouteOutcome) {
        self.drained += 1;
        match outcome {
            RouteOutcome::PositionUpdated { .. } => self.positions += 1,
            RouteOutcome::OrientationUpdated { .. } => self.orientations += 1,
            RouteOutcome::Malformed { .. } => self.malformed += 1,
            RouteOutcome::Unrecognized { .. } => self.unrecognized += 1,
        }
    }

    /// Messages that changed the store.
    #[must_use]
    pub const fn applied(&self) -> u64 {
        self.positions + self.orientations
    }

    /// Adds another report into this one.
    pub fn merge(&mut self, other: &DrainReport) {
        self.drained += other.drained;
        self.positions += other.positions;
        self.orientations += other.orientations;
        self.malformed += other.malformed;
        self.unrecognized += other.unrecognized;
    }
}

/// Routes messages into a [`PoseStore`] and emits fallback diagnostics.
#[derive(Clone, Debug)]
pub struct MessageRouter {
    table: RoutingTable,
    totals: DrainReport,
}

impl MessageRouter {
    /// Creates a router over the given table.
    #[must_use]
    pub fn new(table: RoutingTable) -> Self {
        Self {
            table,
            totals: DrainReport::default(),
        }
    }

    /// The routing table in use.
    #[must_use]
    pub fn table(&self) -> &RoutingTable {
        &self.table
    }

    /// Everything routed since creation.
    #[must_use]
    pub const fn totals(&self) -> &DrainReport {
        &self.totals
    }

    /// Routes one message without logging or counting.
    #[must_use]
    pub fn route(&self, message: &InboundMessage, store: &mut PoseStore) -> RouteOutcome {
        let Some(route) = self.table.lookup(&message.address) else {
            return RouteOutcome::Unrecognized {
                diagnostic: format_message(message),
            };
        };

        let malformed = |reason| RouteOutcome::Malformed {
            route,
            reason,
            diagnostic: format_message(message),
        };

        match route.field {
            PoseField::Position => match extract::<3>(message) {
                Ok([x, y, z]) => {
                    let position = convert_position(x, y, z);
                    store.set_position(route.hand, position);
                    RouteOutcome::PositionUpdated {
                        hand: route.hand,
                        position,
                    }
                }
                Err(reason) => malformed(reason),
            },
            PoseField::Orientation => match extract::<4>(message) {
                Ok([w, x, y, z]) => {
                    let orientation = convert_orientation(w, x, y, z);
                    store.set_orientation(route.hand, orientation);
                    RouteOutcome::OrientationUpdated {
                        hand: route.hand,
                        orientation,
                    }
                }
                Err(reason) => malformed(reason),
            },
        }
    }

    /// Routes one message, emits its diagnostic if any, and counts it.
    ///
    /// Unrecognized messages log at INFO and malformed ones at WARN, both on
    /// [`FALLBACK_TARGET`]. Filter that target to silence them.
    pub fn dispatch(&mut self, message: &InboundMessage, store: &mut PoseStore) -> RouteOutcome {
        let outcome = self.route(message, store);
        match &outcome {
            RouteOutcome::Unrecognized { diagnostic } => {
                tracing::info!(target: FALLBACK_TARGET, "{}", diagnostic);
            }
            RouteOutcome::Malformed { reason, diagnostic, .. } => {
                tracing::warn!(target: FALLBACK_TARGET, "{} ({})", diagnostic, reason);
            }
            _ => {}
        }
        self.totals.record(&outcome);
        outcome
    }

    /// Drains everything the source has buffered right now, in order.
    pub fn drain<S: MessageSource + ?Sized>(
        &mut self,
        source: &mut S,
        store: &mut PoseStore,
    ) -> DrainReport {
        let mut report = DrainReport::default();
        let pending = source.poll_pending();

        for _ in 0..pending {
            let Some(message) = source.next_message() else {
                break;
            };
            let outcome = self.dispatch(&message, store);
            report.record(&outcome);
        }

        if report.drained > 0 {
            tracing::trace!(
                drained = report.drained,
                applied = report.applied(),
                malformed = report.malformed,
                unrecognized = report.unrecognized,
                "drain complete"
            );
        }
        report
    }
}

impl Default for MessageRouter {
    fn default() -> Self {
        Self::new(RoutingTable::hands())
    }
}

/// Pulls exactly `N` finite numbers out of a message.
fn extract<const N: usize>(message: &InboundMessage) -> Result<[f32; N], MalformedReason> {
    if message.args.len() != N {
        return Err(MalformedReason::WrongArity {
            expected: N,
            found: message.args.len(),
        });
    }

    let mut out = [0.0f32; N];
    for (index, (slot, arg)) in out.iter_mut().zip(&message.args).enumerate() {
        let value = arg.as_f32().ok_or(MalformedReason::NonNumericArgument {
            index,
            found: arg.type_name(),
        })?;
        if !value.is_finite() {
            return Err(MalformedReason::NonFiniteArgument { index });
        }
        *slot = value;
    }
    Ok(out)
}
