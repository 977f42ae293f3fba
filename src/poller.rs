//! Entity-set polling.
//!
//! Every tick refreshes the local viewer, then every tracked entity slot
//! with the viewer's team excluded, and publishes whatever updated
//! successfully as a new [`GameSnapshot`].

use std::ops::ControlFlow;
use std::sync::Arc;

use log::{debug, trace, warn};

use crate::entity::{Entity, Viewer};
use crate::memory::GameProcess;
use crate::offsets::Offsets;
use crate::snapshot::{GameSnapshot, SnapshotCell};
use crate::threaded::FrameAction;

/// Producer of [`GameSnapshot`]s.
pub struct EntityPoller {
    process: Arc<dyn GameProcess>,
    offsets: Offsets,
    viewer: Viewer,
    slots: Vec<Entity>,
    cell: Arc<SnapshotCell>,
    frame: u64,
}

impl EntityPoller {
    /// Creates a poller scanning `entity_slots` entity-list slots.
    #[must_use]
    pub fn new(
        process: Arc<dyn GameProcess>,
        offsets: Offsets,
        entity_slots: usize,
        cell: Arc<SnapshotCell>,
    ) -> Self {
        Self {
            process,
            offsets,
            viewer: Viewer::default(),
            slots: (0..entity_slots).map(Entity::new).collect(),
            cell,
            frame: 0,
        }
    }

    /// Shared snapshot destination.
    #[must_use]
    pub fn cell(&self) -> Arc<SnapshotCell> {
        Arc::clone(&self.cell)
    }

    /// Runs one poll cycle and publishes its snapshot.
    ///
    /// When the viewer cannot be resolved no entity is read and an empty
    /// entity list is published with the stale viewer.
    pub fn poll(&mut self) {
        self.frame += 1;
        let process = self.process.as_ref();
        let entities = if self.viewer.update(process, &self.offsets) {
            let excluded = Some(self.viewer.state.team);
            self.slots
                .iter_mut()
                .filter_map(|slot| {
                    slot.update(process, &self.offsets, excluded)
                        .then(|| slot.clone())
                })
                .collect()
        } else {
            trace!("frame {}: local viewer unresolved", self.frame);
            Vec::new()
        };

        debug!("frame {}: {} entities", self.frame, entities.len());
        self.cell.publish(GameSnapshot {
            frame: self.frame,
            viewer: self.viewer.clone(),
            entities,
        });
    }
}

impl FrameAction for EntityPoller {
    fn name(&self) -> &'static str {
        "entity-poller"
    }

    fn frame(&mut self) -> ControlFlow<()> {
        if !self.process.is_valid() {
            warn!("game process invalid, entity poller stopping");
            self.frame += 1;
            self.cell.publish(GameSnapshot {
                frame: self.frame,
                ..GameSnapshot::default()
            });
            return ControlFlow::Break(());
        }
        self.poll();
        ControlFlow::Continue(())
    }
}
