//! # Store Error Types
//!
//! Programmer errors raised while building or configuring tables.
//!
//! Stale handles are an expected, recoverable condition and are reported
//! through `bool`/`Option` returns on the regular operations. The
//! [`StoreError::StaleHandle`] variant only appears on the `Result`-returning
//! component attach path.

use thiserror::Error;

use crate::ecs::TableId;

/// Errors that can occur while using the slot stores.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// An argument violated a construction-time invariant.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A row was registered after the table had already issued entities.
    #[error("cannot register row {component} on table {table}: entities already exist")]
    RowAfterCreate {
        /// The table whose schema is already fixed.
        table: TableId,
        /// Type name of the rejected component.
        component: &'static str,
    },

    /// The component type already has a row in this table.
    #[error("row {component} is already registered on table {table}")]
    RowAlreadyRegistered {
        /// The table holding the row.
        table: TableId,
        /// Type name of the component.
        component: &'static str,
    },

    /// The component type has no row in this table.
    #[error("row {component} is not registered on table {table}")]
    UnregisteredRow {
        /// The table that was searched.
        table: TableId,
        /// Type name of the component.
        component: &'static str,
    },

    /// The handle no longer names a live slot.
    #[error("stale handle")]
    StaleHandle,

    /// Invalid configuration.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
