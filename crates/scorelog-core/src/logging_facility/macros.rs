//! Canonical logging macros
//!
//! A store operation that reaches its engine logs one start event followed
//! by one end or end_error. Input rejected before that logs end_error only.

/// Log the start of an operation
///
/// # Example
///
/// ```
/// # use scorelog_core::log_op_start;
/// log_op_start!("submit_report");
/// log_op_start!("query_partition", partition = "2024-03");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorelog_core_types::schema::EVENT_START,
        );
    };
    ($op:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorelog_core_types::schema::EVENT_START,
            $($field)*
        );
    };
}

/// Log the successful end of an operation
///
/// # Example
///
/// ```
/// # use scorelog_core::log_op_end;
/// log_op_end!("submit_report", duration_ms = 42);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorelog_core_types::schema::EVENT_END,
            duration_ms = $duration,
        );
    };
    ($op:expr, duration_ms = $duration:expr, $($field:tt)*) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = $crate::scorelog_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($field)*
        );
    };
}

/// Log an operation error
///
/// Validation failures are caller mistakes and log at `warn`; everything
/// else logs at `error`.
///
/// # Example
///
/// ```
/// # use scorelog_core::{log_op_error, errors::ReportError};
/// let err = ReportError::MissingField { field: "note" };
/// log_op_error!("submit_report", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.is_validation() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::scorelog_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                message = %ex_err,
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::scorelog_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                message = %ex_err,
            );
        }
    }};
    ($op:expr, $err:expr, duration_ms = $duration:expr, $($field:tt)*) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.is_validation() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = $crate::scorelog_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                message = %ex_err,
                $($field)*
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = $crate::scorelog_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err.kind = ?ex_err.kind(),
                err.code = ex_err.code(),
                message = %ex_err,
                $($field)*
            );
        }
    }};
}
