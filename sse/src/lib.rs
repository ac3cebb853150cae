//! Server-Sent Events (SSE) infrastructure for real-time relationship updates.
//!
//! This crate owns the presence registry (who is reachable right now) and the
//! fan-out path that delivers typed events to every live connection of a user.
//!
//! # Architecture
//!
//! - **Multi-device presence**: a user may hold several simultaneous
//!   connections; all of them receive fan-out traffic.
//! - **Dual-index registry**: O(1) lookups for both connection cleanup and
//!   user-scoped routing via separate DashMap indices. The registry owns its
//!   synchronization; nothing else mutates presence state.
//! - **Ephemeral messages**: there is no outbox and no replay. A user with no
//!   live connection at emission time simply never receives the event and
//!   sees fresh data on the next read.
//! - **Per-connection FIFO**: each connection is backed by its own unbounded
//!   channel, so events to one connection arrive in emission order. No order
//!   is defined across a user's connections.
//!
//! # Message Flow
//!
//! 1. Client establishes the SSE connection; the web layer extracts the
//!    verified user and registers the connection here.
//! 2. A domain mutation commits and publishes a `DomainEvent`.
//! 3. `SseDomainEventHandler` converts it into per-recipient wire events and
//!    hands them to the `Manager`.
//! 4. The manager looks up the recipient's connections and pushes the
//!    serialized event into each channel; send failures are logged and
//!    swallowed, never propagated to the mutation.
//!
//! # Modules
//!
//! - `connection`: ConnectionRegistry with dual-index architecture and type-safe ConnectionId
//! - `manager`: High-level message routing (delegates to ConnectionRegistry)
//! - `message`: Type-safe event, scope, and inbound client message definitions
//! - `domain_event_handler`: events::EventHandler bridging domain events to the wire

pub mod connection;
pub mod domain_event_handler;
pub mod manager;
pub mod message;

pub use manager::Manager;
