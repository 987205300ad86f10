//! Command sequencing for a type change
//!
//! Batch layout: `[reference clears] + [ChangeNodeAggregateType] + [additive writes]`.
//! Additive writes keep migration table order.

use crate::commands::{Command, CommandBatch};
use crate::type_change::planner::MigrationPlan;

/// Combine the type change and the planned writes into one ordered batch
pub fn sequence(change_type: Command, plan: MigrationPlan) -> CommandBatch {
    let MigrationPlan {
        additive_writes,
        reference_clears,
        ..
    } = plan;

    let mut batch: CommandBatch = reference_clears.into_iter().collect();
    batch.push(change_type);
    batch.append(additive_writes.into());
    batch
}
