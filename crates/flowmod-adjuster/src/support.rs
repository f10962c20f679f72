//! Capability checks of a flow against one table.

use of_flow::{Action, FieldType, Instruction, Match};
use of_pipeline::{CapabilityClass, CapabilityKind, TableContext};
use tracing::trace;

/// Returns the match fields the table cannot match on, in OXM order.
pub(crate) fn unsupported_fields(table: &dyn TableContext, flow_match: &Match) -> Vec<FieldType> {
    flow_match
        .field_types()
        .filter(|ft| !table.supports_match_field(*ft))
        .collect()
}

/// Checks every instruction against the table.
///
/// `miss` selects the table-miss capability classes, used for rules with an
/// empty match. Returns the first kind the table rejects.
pub(crate) fn check_instructions(
    table: &dyn TableContext,
    instructions: &[Instruction],
    miss: bool,
) -> Result<(), CapabilityKind> {
    let class = CapabilityClass::instructions(miss);
    for instruction in instructions {
        let it = instruction.instruction_type();
        if !table.supports_capability(class, it.into()) {
            trace!(table = %table.table_id(), %class, kind = %it, "instruction rejected");
            return Err(it.into());
        }

        match instruction {
            Instruction::ApplyActions(actions) => {
                check_actions(table, actions, CapabilityClass::apply(miss))?
            }
            Instruction::WriteActions(actions) => {
                check_actions(table, actions, CapabilityClass::write(miss))?
            }
            Instruction::GotoTable(target) => {
                if !table.supports_next_table(class, *target) {
                    trace!(table = %table.table_id(), %class, %target, "goto target rejected");
                    return Err(it.into());
                }
            }
            Instruction::WriteMetadata { .. }
            | Instruction::ClearActions
            | Instruction::Meter(_)
            | Instruction::Experimenter(_) => {}
        }
    }
    Ok(())
}

fn check_actions(
    table: &dyn TableContext,
    actions: &[Action],
    class: CapabilityClass,
) -> Result<(), CapabilityKind> {
    for action in actions {
        let at = action.action_type();
        if !table.supports_capability(class, at.into()) {
            trace!(table = %table.table_id(), %class, kind = %at, "action rejected");
            return Err(at.into());
        }
        if let Action::SetField(field) = action {
            let ft = field.field_type();
            if !table.supports_set_field(class, ft) {
                trace!(table = %table.table_id(), %class, field = %ft, "set-field rejected");
                return Err(at.into());
            }
        }
    }
    Ok(())
}
