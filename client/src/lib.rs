//! # Game Client Runtime
//!
//! State-synchronization and interaction-derivation engine for the
//! multiplayer space-mining game. The client keeps a local mirror of the
//! server-authoritative world (players, NPCs, mineable asteroids), holds a
//! persistent connection alive across failures, and derives interactive
//! affordances from the mirrored state. It never computes game outcomes;
//! it displays state and requests actions.
//!
//! ## Module Organization
//!
//! - [`transport`] — connection lifecycle: idempotent connect, fixed-interval
//!   reconnection, the single-pending-timer guarantee.
//! - [`world`] — the mirrored world model: player/NPC maps, the positional
//!   object set, the local player identity, pending optimistic removals.
//! - [`reconcile`] — interprets inbound protocol messages, choosing between
//!   wholesale replacement and incremental mutation per action tag, and
//!   reports what must be re-derived.
//! - [`affordance`] — proximity-derived enablement: what is mineable, what
//!   is attackable, whether the controls light up.
//! - [`viewport`] — camera offset centered on the local player and the
//!   fixed-width minimap projection.
//! - [`input`] — turns key events into outbound action requests, with
//!   bounds and precondition gating.
//! - [`sink`] — the presentation boundary: draw/control intents consumed by
//!   an external renderer.
//! - [`session`] — the owned per-connection context and its event loop.
//!
//! Data flows one way: transport → reconciler → world model → affordances
//! and projections → sink. The input dispatcher reads the world model but
//! only the reconciler (plus the explicit optimistic mine removal) mutates
//! it.

pub mod affordance;
pub mod input;
pub mod reconcile;
pub mod session;
pub mod sink;
pub mod transport;
pub mod viewport;
pub mod world;
