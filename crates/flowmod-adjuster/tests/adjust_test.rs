//! Placement scenarios against a two-table pipeline.
//!
//! Table 0 is a narrow VLAN table that chains to table 100 on miss. Table
//! 100 is a wide, terminal table that can match and apply more.

use std::sync::Arc;
use std::thread;

use flowmod_adjuster::{
    normal_action, steal_action, AdjustError, AdjusterConfig, FlowModAdjuster,
    DEFAULT_FLOW_COOKIE,
};
use of_flow::{
    Action, ActionType, FieldType, FlowBody, FlowMod, Instruction, InstructionType, Match,
    MatchField,
};
use of_pipeline::{
    CapabilityClass, CapabilityKind, Pipeline, PipelineConfig, PipelineDefinition, TableFeatures,
};
use of_types::{IpPrefix, PortNumber, ProtocolVersion, TableId, VlanVid};
use pretty_assertions::assert_eq;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn tid(n: u8) -> TableId {
    TableId::new(n).unwrap()
}

fn entry_table() -> TableFeatures {
    TableFeatures::builder(tid(0))
        .with_name("vlan")
        .with_matches([FieldType::EthType, FieldType::VlanVid])
        .with_instructions([InstructionType::ApplyActions, InstructionType::GotoTable])
        .with_miss_instructions([InstructionType::ApplyActions, InstructionType::GotoTable])
        .with_apply_actions([ActionType::Output])
        .with_miss_apply_actions([ActionType::Output])
        .with_miss_target(tid(100))
        .build()
}

fn wide_table() -> TableFeatures {
    TableFeatures::builder(tid(100))
        .with_name("policy")
        .with_matches([
            FieldType::InPort,
            FieldType::EthType,
            FieldType::VlanVid,
            FieldType::VlanPcp,
            FieldType::Ipv4Dst,
        ])
        .with_instructions([
            InstructionType::ApplyActions,
            InstructionType::WriteActions,
            InstructionType::Meter,
        ])
        .with_miss_instructions([InstructionType::ApplyActions])
        .with_apply_actions([ActionType::Output, ActionType::DecNwTtl, ActionType::SetField])
        .with_miss_apply_actions([ActionType::Output])
        .with_set_fields(CapabilityClass::Apply, [FieldType::VlanPcp])
        .with_write_actions([ActionType::Group])
        .build()
}

fn pipeline() -> Pipeline {
    Pipeline::builder()
        .with_tables([entry_table(), wide_table()])
        .build()
        .unwrap()
}

fn adjuster(hybrid_mode: bool) -> FlowModAdjuster {
    init_tracing();
    let adjuster = FlowModAdjuster::new();
    adjuster
        .configure(ProtocolVersion::V1_3, Arc::new(pipeline()), hybrid_mode)
        .unwrap();
    adjuster
}

fn arp_match() -> Match {
    Match::builder()
        .field(MatchField::EthType(0x0806))
        .build()
        .unwrap()
}

fn four_field_match() -> Match {
    let dst: IpPrefix = "10.1.0.0/16".parse().unwrap();
    Match::builder()
        .field(MatchField::EthType(0x0800))
        .field(MatchField::VlanPcp(5))
        .field(MatchField::VlanVid(VlanVid::Tagged(100)))
        .field(MatchField::Ipv4Dst(dst))
        .build()
        .unwrap()
}

fn flow(flow_match: Match, instruction: Instruction) -> FlowMod {
    FlowMod::builder()
        .flow_match(flow_match)
        .instruction(instruction)
        .priority(30000)
        .cookie(0xa11c_e000)
        .idle_timeout(300)
        .build()
        .unwrap()
}

/// Every emitted rule is legal for the table it was assigned: its match
/// fields, instructions, actions, set-field targets and goto targets are all
/// supported under the capability classes its match selects.
fn assert_legal(pipeline: &Pipeline, rules: &[FlowMod]) {
    for rule in rules {
        let table = rule.table_id.expect("rule has a table");
        let ctx = pipeline.table_context(table).expect("table is known");
        for ft in rule.flow_match.field_types() {
            assert!(ctx.supports_match_field(ft), "{} cannot match {}", table, ft);
        }

        let miss = rule.is_table_miss();
        let class = CapabilityClass::instructions(miss);
        for instruction in rule.instructions().expect("rule carries instructions") {
            let it = instruction.instruction_type();
            assert!(
                ctx.supports_capability(class, it.into()),
                "{} rejects {} under {}",
                table,
                it,
                class
            );
            let (actions, action_class) = match instruction {
                Instruction::ApplyActions(actions) => (actions, CapabilityClass::apply(miss)),
                Instruction::WriteActions(actions) => (actions, CapabilityClass::write(miss)),
                Instruction::GotoTable(target) => {
                    assert!(
                        ctx.supports_next_table(class, *target),
                        "{} cannot goto {} under {}",
                        table,
                        target,
                        class
                    );
                    continue;
                }
                _ => continue,
            };
            for action in actions {
                let at = action.action_type();
                assert!(
                    ctx.supports_capability(action_class, at.into()),
                    "{} rejects {} under {}",
                    table,
                    at,
                    action_class
                );
                if let Action::SetField(field) = action {
                    assert!(
                        ctx.supports_set_field(action_class, field.field_type()),
                        "{} cannot set {} under {}",
                        table,
                        field.field_type(),
                        action_class
                    );
                }
            }
        }
    }
}

#[test]
fn test_fits_entry_table() {
    let adjuster = adjuster(true);
    let arp = flow(
        arp_match(),
        Instruction::ApplyActions(vec![
            Action::to_controller(Action::CONTROLLER_MAX),
            Action::output(PortNumber::NORMAL),
        ]),
    );

    let result = adjuster.adjust(&arp).unwrap();
    assert_eq!(result, vec![arp.placed_in(tid(0))]);
    assert_legal(&pipeline(), &result);
}

#[test]
fn test_partial_match_narrowed_and_chained() {
    let adjuster = adjuster(true);
    let apply = Instruction::ApplyActions(vec![Action::output(PortNumber::NORMAL)]);
    let original = flow(four_field_match(), apply.clone());

    let result = adjuster.adjust(&original).unwrap();
    assert_eq!(result.len(), 2);

    let narrowed = &result[0];
    assert_eq!(narrowed.table_id, Some(tid(0)));
    assert_eq!(
        narrowed.flow_match.field_types().collect::<Vec<_>>(),
        vec![FieldType::EthType, FieldType::VlanVid]
    );
    assert_eq!(
        narrowed.body,
        FlowBody::Instructions(vec![Instruction::GotoTable(tid(100))])
    );
    assert_eq!(narrowed.priority, original.priority);
    assert_eq!(narrowed.cookie, original.cookie);

    let full = &result[1];
    assert_eq!(full.table_id, Some(tid(100)));
    assert_eq!(full.flow_match, original.flow_match);
    assert_eq!(full.body, FlowBody::Instructions(vec![apply]));

    assert_legal(&pipeline(), &result);
}

#[test]
fn test_unsupported_action_relocates_whole_flow() {
    let adjuster = adjuster(true);
    let original = flow(arp_match(), Instruction::ApplyActions(vec![Action::DecNwTtl]));

    let result = adjuster.adjust(&original).unwrap();
    assert_eq!(result, vec![original.placed_in(tid(100))]);
    assert_legal(&pipeline(), &result);
}

#[test]
fn test_write_action_supported_nowhere() {
    let adjuster = adjuster(true);
    let write = Instruction::WriteActions(vec![Action::output(PortNumber::FLOOD)]);

    let err = adjuster.adjust(&flow(arp_match(), write.clone())).unwrap_err();
    assert!(err.is_flow_unsupported());
    assert!(matches!(
        err,
        AdjustError::UnsupportedInstruction {
            kind: CapabilityKind::Action(ActionType::Output),
            table,
        } if table == tid(100)
    ));

    // Table-miss rules are checked against the miss classes.
    let err = adjuster.adjust(&flow(Match::all(), write)).unwrap_err();
    assert!(err.is_flow_unsupported());
}

#[test]
fn test_clear_actions_supported_nowhere() {
    let adjuster = adjuster(true);
    for flow_match in [Match::all(), arp_match(), four_field_match()] {
        let err = adjuster
            .adjust(&flow(flow_match, Instruction::ClearActions))
            .unwrap_err();
        assert!(
            matches!(
                err,
                AdjustError::UnsupportedInstruction {
                    kind: CapabilityKind::Instruction(InstructionType::ClearActions),
                    ..
                }
            ),
            "unexpected error: {}",
            err
        );
    }
}

#[test]
fn test_goto_matching_default_suppressed() {
    let goto = flow(Match::all(), Instruction::GotoTable(tid(100)));

    let pure = adjuster(false);
    assert!(pure.adjust(&goto).unwrap().is_empty());

    // In hybrid mode table 0's default applies NORMAL, so the goto is new.
    let hybrid = adjuster(true);
    assert_eq!(hybrid.adjust(&goto).unwrap(), vec![goto.placed_in(tid(0))]);
    assert_legal(&pipeline(), &hybrid.adjust(&goto).unwrap());
}

#[test]
fn test_pass_through_matching_default_suppressed() {
    // Table 0 matches nothing of this flow, so its pass-through is the
    // match-all goto that the default flow already installs.
    let adjuster = adjuster(false);
    let dst: IpPrefix = "192.168.1.1".parse().unwrap();
    let original = flow(
        Match::builder()
            .field(MatchField::Ipv4Dst(dst))
            .build()
            .unwrap(),
        Instruction::ApplyActions(vec![Action::DecNwTtl]),
    );

    let result = adjuster.adjust(&original).unwrap();
    assert_eq!(result, vec![original.placed_in(tid(100))]);
    assert_legal(&pipeline(), &result);
}

#[test]
fn test_defaults_two_tables() {
    let adjuster = adjuster(true);

    let hybrid = adjuster.defaults(true).unwrap();
    assert_eq!(hybrid.len(), 2);
    for (rule, table) in hybrid.iter().zip([tid(0), tid(100)]) {
        assert_eq!(rule.table_id, Some(table));
        assert!(rule.is_table_miss());
        assert_eq!(rule.priority, 0);
        assert_eq!(rule.cookie, DEFAULT_FLOW_COOKIE);
        assert_eq!(
            rule.body,
            FlowBody::Instructions(vec![Instruction::ApplyActions(vec![normal_action()])])
        );
    }

    let pure = adjuster.defaults(false).unwrap();
    assert_eq!(pure.len(), 2);
    assert_eq!(
        pure[0].body,
        FlowBody::Instructions(vec![Instruction::GotoTable(tid(100))])
    );
    assert_eq!(
        pure[1].body,
        FlowBody::Instructions(vec![Instruction::ApplyActions(vec![steal_action()])])
    );
    assert_legal(&pipeline(), &hybrid);
    assert_legal(&pipeline(), &pure);
}

#[test]
fn test_adjust_is_idempotent() {
    let adjuster = adjuster(true);
    let flows = [
        flow(arp_match(), Instruction::ApplyActions(vec![Action::output(PortNumber::NORMAL)])),
        flow(four_field_match(), Instruction::ApplyActions(vec![Action::output(PortNumber::NORMAL)])),
        flow(arp_match(), Instruction::ApplyActions(vec![Action::DecNwTtl])),
        flow(
            arp_match(),
            Instruction::ApplyActions(vec![Action::SetField(MatchField::VlanPcp(3))]),
        ),
    ];

    for original in &flows {
        let rules = adjuster.adjust(original).unwrap();
        assert_legal(&pipeline(), &rules);
        for rule in rules {
            let again = adjuster.adjust(&rule).unwrap();
            assert_legal(&pipeline(), &again);
            assert_eq!(again, vec![rule.clone()]);
        }
    }
}

#[test]
fn test_set_field_checked_per_field() {
    let adjuster = adjuster(true);
    let ok = flow(
        arp_match(),
        Instruction::ApplyActions(vec![Action::SetField(MatchField::VlanPcp(3))]),
    );
    let result = adjuster.adjust(&ok).unwrap();
    assert_eq!(result, vec![ok.placed_in(tid(100))]);
    assert_legal(&pipeline(), &result);

    let bad = flow(
        arp_match(),
        Instruction::ApplyActions(vec![Action::SetField(MatchField::IpDscp(10))]),
    );
    assert!(matches!(
        adjuster.adjust(&bad),
        Err(AdjustError::UnsupportedInstruction {
            kind: CapabilityKind::Action(ActionType::SetField),
            ..
        })
    ));
}

#[test]
fn test_unsupported_match_without_chain() {
    let adjuster = FlowModAdjuster::new();
    let single = Pipeline::builder().with_table(wide_table()).build().unwrap();
    adjuster
        .configure(ProtocolVersion::V1_3, Arc::new(single), true)
        .unwrap();

    let original = flow(
        Match::builder()
            .field(MatchField::EthType(0x0800))
            .field(MatchField::TcpDst(443))
            .build()
            .unwrap(),
        Instruction::ApplyActions(vec![Action::output(PortNumber::NORMAL)]),
    );
    let err = adjuster.adjust(&original).unwrap_err();
    assert!(matches!(
        err,
        AdjustError::UnsupportedMatch { ref fields, table }
            if *fields == vec![FieldType::TcpDst] && table == tid(100)
    ));
}

#[test]
fn test_single_table_identity() {
    let adjuster = FlowModAdjuster::new();
    adjuster
        .configure(ProtocolVersion::V1_0, Arc::new(pipeline()), false)
        .unwrap();

    // Under 1.3 this match would need narrowing; 1.0 never looks at tables.
    let original = FlowMod::builder()
        .flow_match(four_field_match())
        .action(Action::output(PortNumber::FLOOD))
        .build()
        .unwrap();
    assert_eq!(adjuster.adjust(&original).unwrap(), vec![original]);

    let defaults = adjuster.defaults(false).unwrap();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].table_id, None);
    assert_eq!(defaults[0].actions(), Some(&[steal_action()][..]));
}

#[test]
fn test_no_tables_known() {
    let adjuster = FlowModAdjuster::new();
    adjuster
        .configure(ProtocolVersion::V1_3, Arc::new(Pipeline::empty()), true)
        .unwrap();

    let original = FlowMod::builder()
        .flow_match(four_field_match())
        .actions([Action::DecNwTtl, Action::output(PortNumber::NORMAL)])
        .build()
        .unwrap();
    let result = adjuster.adjust(&original).unwrap();
    assert_eq!(result.len(), 1);
    assert_eq!(result[0].table_id, Some(TableId::BASE));
    assert_eq!(result[0].flow_match, original.flow_match);
    assert_eq!(
        result[0].body,
        FlowBody::Instructions(vec![Instruction::ApplyActions(vec![
            Action::DecNwTtl,
            Action::output(PortNumber::NORMAL),
        ])])
    );

    let defaults = adjuster.defaults(true).unwrap();
    assert_eq!(defaults.len(), 1);
    assert_eq!(defaults[0].table_id, Some(TableId::BASE));
}

#[test]
fn test_from_yaml_config() {
    init_tracing();
    let yaml = r#"
version: "1.3"
hybrid_mode: false
pipeline:
  tables:
    - table_id: 0
      match_fields: [ETH_TYPE, VLAN_VID]
      instructions: [APPLY_ACTIONS, GOTO_TABLE]
      instructions_miss: [GOTO_TABLE]
      apply_actions: [OUTPUT]
      miss_target: 100
    - table_id: 100
      match_fields: [ETH_TYPE, VLAN_VID, VLAN_PCP, IPV4_DST]
      instructions: [APPLY_ACTIONS]
      apply_actions: [OUTPUT]
"#;
    let config = AdjusterConfig::from_yaml(yaml).unwrap();
    let adjuster = FlowModAdjuster::from_config(&config).unwrap();
    assert_eq!(adjuster.hybrid_mode(), Some(false));

    let original = flow(
        four_field_match(),
        Instruction::ApplyActions(vec![Action::output(PortNumber::NORMAL)]),
    );
    let result = adjuster.adjust(&original).unwrap();
    assert_eq!(result.len(), 2);
    assert_eq!(result[0].table_id, Some(tid(0)));
    assert_eq!(
        result[0].body,
        FlowBody::Instructions(vec![Instruction::GotoTable(tid(100))])
    );
    assert_eq!(result[1], original.placed_in(tid(100)));

    let pipeline: Pipeline = config.pipeline.unwrap().try_into().unwrap();
    assert_legal(&pipeline, &result);
}

#[test]
fn test_bad_pipeline_config_rejected() {
    let config = AdjusterConfig::new(ProtocolVersion::V1_3).with_pipeline(PipelineConfig {
        tables: vec![entry_table()],
    });
    assert!(matches!(
        FlowModAdjuster::from_config(&config),
        Err(AdjustError::Pipeline(_))
    ));
}

#[test]
fn test_concurrent_adjust() {
    let adjuster = Arc::new(adjuster(false));
    let original = flow(
        four_field_match(),
        Instruction::ApplyActions(vec![Action::output(PortNumber::NORMAL)]),
    );
    let expected = adjuster.adjust(&original).unwrap();
    assert_legal(&pipeline(), &expected);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let adjuster = Arc::clone(&adjuster);
            let original = original.clone();
            thread::spawn(move || {
                (0..100)
                    .map(|_| adjuster.adjust(&original).unwrap())
                    .collect::<Vec<_>>()
            })
        })
        .collect();

    for handle in handles {
        for result in handle.join().unwrap() {
            assert_eq!(result, expected);
        }
    }
}
