use crate::runtime::{AnimationInfo, ArtboardSource, RuntimeFault, StateMachineInfo};

/// Structural metadata of one artboard.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtboardScan {
    pub name: String,
    pub animations: Vec<AnimationInfo>,
    pub state_machines: Vec<StateMachineInfo>,
}

/// Collect animations and state-machine inputs. Items that fault are skipped.
pub fn scan_artboard(artboard: &dyn ArtboardSource) -> ArtboardScan {
    let name = artboard.name();
    let animations = collect_indexed(
        &name,
        "animation",
        artboard.animation_count(),
        |i| artboard.animation_at(i),
    );
    let state_machines = collect_indexed(
        &name,
        "state machine",
        artboard.state_machine_count(),
        |i| artboard.state_machine_at(i),
    );
    ArtboardScan {
        name,
        animations,
        state_machines,
    }
}

fn collect_indexed<T>(
    artboard: &str,
    what: &str,
    count: Result<usize, RuntimeFault>,
    mut at: impl FnMut(usize) -> Result<Option<T>, RuntimeFault>,
) -> Vec<T> {
    let count = match count {
        Ok(n) => n,
        Err(fault) => {
            tracing::debug!(artboard, what, %fault, "count unavailable");
            return Vec::new();
        }
    };

    (0..count)
        .filter_map(|i| match at(i) {
            Ok(item) => item,
            Err(fault) => {
                tracing::debug!(artboard, what, index = i, %fault, "item unreadable");
                None
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "../../tests/unit/document/scan.rs"]
mod tests;
