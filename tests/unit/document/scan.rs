use super::*;
use crate::runtime::{InputDecl, InputKind, LiveInstance};

struct FlakyArtboard;

impl ArtboardSource for FlakyArtboard {
    fn name(&self) -> String {
        "Flaky".to_string()
    }

    fn animation_count(&self) -> Result<usize, RuntimeFault> {
        Ok(3)
    }

    fn animation_at(&self, index: usize) -> Result<Option<AnimationInfo>, RuntimeFault> {
        match index {
            1 => Err(RuntimeFault::new("animation detached")),
            _ => Ok(Some(AnimationInfo {
                name: format!("anim{index}"),
                fps: Some(60),
                duration: None,
                loop_mode: None,
            })),
        }
    }

    fn state_machine_count(&self) -> Result<usize, RuntimeFault> {
        Err(RuntimeFault::new("no state machines"))
    }

    fn state_machine_at(&self, _index: usize) -> Result<Option<StateMachineInfo>, RuntimeFault> {
        unreachable!("count faulted")
    }

    fn default_instance(&self) -> Result<Option<Box<dyn LiveInstance + '_>>, RuntimeFault> {
        Ok(None)
    }
}

#[test]
fn faulting_items_are_skipped() {
    let scan = scan_artboard(&FlakyArtboard);
    assert_eq!(scan.name, "Flaky");
    let names: Vec<_> = scan.animations.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(names, ["anim0", "anim2"]);
    assert!(scan.state_machines.is_empty());
}

#[test]
fn scan_serializes_inputs_with_type_names() {
    let artboard = crate::runtime::memory::MemoryArtboard {
        name: "Main".to_string(),
        state_machines: vec![StateMachineInfo {
            name: "Controller".to_string(),
            inputs: vec![
                InputDecl {
                    name: "hover".to_string(),
                    kind: InputKind::Boolean,
                },
                InputDecl {
                    name: "level".to_string(),
                    kind: InputKind::Number,
                },
                InputDecl {
                    name: "click".to_string(),
                    kind: InputKind::Trigger,
                },
            ],
        }],
        ..Default::default()
    };

    let json = serde_json::to_value(scan_artboard(&artboard)).unwrap();
    assert_eq!(
        json["stateMachines"][0]["inputs"],
        serde_json::json!([
            { "name": "hover", "type": "boolean" },
            { "name": "level", "type": "number" },
            { "name": "click", "type": "trigger" }
        ])
    );
    assert_eq!(json["animations"], serde_json::json!([]));
}
