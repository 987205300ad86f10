//! Boundary logging for hooks, handlers and loaders
//!
//! The plugin has four traced boundaries: `node_type_changed_hook`,
//! `type_selection_creation`, `node_types_load` and `content_load`. Each
//! emits one `start` event and then either `end` or `end_error`, all at the
//! calling module's `component`. Extra fields follow the `tracing` field
//! syntax and are appended after the fixed ones.
//!
//! The planner and the data source are not boundaries; they log at `debug`
//! directly.

/// Shared expansion; not part of the public surface
#[doc(hidden)]
#[macro_export]
macro_rules! __log_op_event {
    ($level:ident, $op:expr, $event:expr, $($field:tt)*) => {
        tracing::$level!(
            component = module_path!(),
            op = $op,
            event = $event,
            $($field)*
        )
    };
}

/// Enter a boundary
///
/// ```
/// # use subgroups_core::log_op_start;
/// log_op_start!("content_load");
/// log_op_start!("node_type_changed_hook", node_aggregate_id = "n1", workspace = "live");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            subgroups_core_types::schema::EVENT_START,
            $($($field)*)?
        )
    };
}

/// Leave a boundary normally; `duration_ms` is mandatory
///
/// ```
/// # use subgroups_core::log_op_end;
/// log_op_end!("node_types_load", duration_ms = 3, node_type_count = 5);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        $crate::__log_op_event!(
            info,
            $op,
            subgroups_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        )
    };
}

/// Leave a boundary with an error
///
/// Takes either a `SubgroupsError` or an `ExError`; the event carries the
/// stable `err.kind` and `err.code` of the converted value.
///
/// ```
/// # use subgroups_core::{log_op_error, errors::SubgroupsError};
/// let err = SubgroupsError::NodeTypeNotFound { node_type_name: "Vendor:Missing".to_string() };
/// log_op_error!("type_selection_creation", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        $crate::__log_op_event!(
            error,
            $op,
            subgroups_core_types::schema::EVENT_END_ERROR,
            duration_ms = $duration,
            err.kind = ?ex_err.kind(),
            err.code = ex_err.code(),
            $($($field)*)?
        )
    }};
}
