//! Drawing document: the single owned entity store.

use crate::entities::{Entity, EntityId, EntityRecord, EntityTrait, Wall, WallCornerTable};
use crate::error::DraftResult;
use crate::geometry::Vector2;
use crate::wall_types::WallTypeRegistry;
use kurbo::Rect;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Maximum number of undo states to keep.
const MAX_UNDO_HISTORY: usize = 50;

/// A snapshot of drawing state for undo/redo.
#[derive(Debug, Clone)]
struct DrawingSnapshot {
    entities: HashMap<EntityId, Entity>,
    z_order: Vec<EntityId>,
}

/// On-disk form of a drawing.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DrawingFile {
    id: String,
    name: String,
    entities: Vec<EntityRecord>,
}

/// A drawing containing all entities, in z-order.
///
/// Everything that renders, snaps or gets picked goes through this store;
/// adding or removing an entity here is the only registration step.
#[derive(Debug, Clone)]
pub struct Drawing {
    /// Unique drawing identifier.
    pub id: String,
    /// Drawing name.
    pub name: String,
    entities: HashMap<EntityId, Entity>,
    /// Back to front.
    z_order: Vec<EntityId>,
    undo_stack: Vec<DrawingSnapshot>,
    redo_stack: Vec<DrawingSnapshot>,
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

impl Drawing {
    /// Create a new empty drawing.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: "Untitled".to_string(),
            entities: HashMap::new(),
            z_order: Vec::new(),
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    fn snapshot(&self) -> DrawingSnapshot {
        DrawingSnapshot {
            entities: self.entities.clone(),
            z_order: self.z_order.clone(),
        }
    }

    fn restore(&mut self, snapshot: DrawingSnapshot) {
        self.entities = snapshot.entities;
        self.z_order = snapshot.z_order;
    }

    /// Push current state to undo stack (call before making changes).
    pub fn push_undo(&mut self) {
        let snapshot = self.snapshot();
        self.undo_stack.push(snapshot);
        self.redo_stack.clear();
        if self.undo_stack.len() > MAX_UNDO_HISTORY {
            self.undo_stack.remove(0);
        }
    }

    /// Drop the most recent undo point without restoring it. Used when an
    /// interactive change is cancelled and reverted by hand.
    pub fn discard_last_undo(&mut self) -> bool {
        self.undo_stack.pop().is_some()
    }

    /// Undo the last change.
    /// Returns true if undo was performed, false if nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(snapshot) = self.undo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.redo_stack.push(current);
        self.restore(snapshot);
        true
    }

    /// Redo the last undone change.
    pub fn redo(&mut self) -> bool {
        let Some(snapshot) = self.redo_stack.pop() else {
            return false;
        };
        let current = self.snapshot();
        self.undo_stack.push(current);
        self.restore(snapshot);
        true
    }

    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Add an entity on top of the z-order.
    pub fn add_entity(&mut self, entity: impl Into<Entity>) -> EntityId {
        let entity = entity.into();
        let id = entity.id();
        log::debug!("Adding {:?} {}", entity.kind(), id);
        if self.entities.insert(id, entity).is_none() {
            self.z_order.push(id);
        }
        id
    }

    /// Remove an entity. Once removed it can no longer be picked or snapped.
    pub fn remove_entity(&mut self, id: EntityId) -> Option<Entity> {
        self.z_order.retain(|&entity_id| entity_id != id);
        let removed = self.entities.remove(&id);
        if removed.is_some() {
            log::debug!("Removed entity {id}");
        }
        removed
    }

    /// Clear all entities from the drawing.
    pub fn clear(&mut self) {
        self.entities.clear();
        self.z_order.clear();
    }

    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.entities.get(&id)
    }

    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entities.get_mut(&id)
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Entities in z-order (back to front).
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.z_order.iter().filter_map(|id| self.entities.get(id))
    }

    pub fn walls(&self) -> impl Iterator<Item = &Wall> {
        self.entities().filter_map(Entity::as_wall)
    }

    pub fn len(&self) -> usize {
        self.entities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Bring an entity to the front (topmost).
    pub fn bring_to_front(&mut self, id: EntityId) {
        if self.contains(id) {
            self.z_order.retain(|&entity_id| entity_id != id);
            self.z_order.push(id);
        }
    }

    /// Send an entity to the back (bottommost).
    pub fn send_to_back(&mut self, id: EntityId) {
        if self.contains(id) {
            self.z_order.retain(|&entity_id| entity_id != id);
            self.z_order.insert(0, id);
        }
    }

    /// Bounding box of all entities.
    pub fn bounds(&self) -> Option<Rect> {
        self.entities()
            .map(|e| e.bounding_box())
            .reduce(|acc, b| acc.union(b))
    }

    /// Visible, unlocked entities near a point, front to back.
    pub fn entities_at_point(&self, point: Vector2, tolerance: f64) -> Vec<EntityId> {
        self.z_order
            .iter()
            .rev()
            .filter_map(|id| self.entities.get(id))
            .filter(|e| is_pickable(e) && e.contains_point(point, tolerance))
            .map(|e| e.id())
            .collect()
    }

    /// Topmost pickable entity at a point.
    pub fn pick(&self, point: Vector2, tolerance: f64) -> Option<EntityId> {
        self.entities_at_point(point, tolerance).into_iter().next()
    }

    /// Visible, unlocked entities touched by a selection window.
    pub fn entities_in_rect(&self, min: Vector2, max: Vector2) -> Vec<EntityId> {
        self.entities()
            .filter(|e| is_pickable(e) && e.intersects_rectangle(min, max))
            .map(|e| e.id())
            .collect()
    }

    pub fn selected_ids(&self) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.properties().selected)
            .map(|e| e.id())
            .collect()
    }

    /// Selected entities that modify tools may change.
    pub fn selected_unlocked_ids(&self) -> Vec<EntityId> {
        self.entities()
            .filter(|e| e.properties().selected && !e.properties().locked)
            .map(|e| e.id())
            .collect()
    }

    pub fn is_selected(&self, id: EntityId) -> bool {
        self.get(id).is_some_and(|e| e.properties().selected)
    }

    pub fn set_selected(&mut self, id: EntityId, selected: bool) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.properties_mut().selected = selected;
        }
    }

    pub fn toggle_selected(&mut self, id: EntityId) {
        if let Some(entity) = self.entities.get_mut(&id) {
            let props = entity.properties_mut();
            props.selected = !props.selected;
        }
    }

    pub fn clear_selection(&mut self) {
        for entity in self.entities.values_mut() {
            entity.properties_mut().selected = false;
        }
    }

    /// Replace the selection.
    pub fn select_only(&mut self, ids: &[EntityId]) {
        self.clear_selection();
        for &id in ids {
            self.set_selected(id, true);
        }
    }

    pub fn select_all(&mut self) {
        for entity in self.entities.values_mut() {
            if is_pickable(entity) {
                entity.properties_mut().selected = true;
            }
        }
    }

    /// Corner-join table for all walls in the drawing.
    pub fn wall_corners(&self, tolerance: f64) -> WallCornerTable {
        Wall::detect_corners(self.walls(), tolerance)
    }

    /// Serialize the drawing to JSON.
    pub fn to_json(&self) -> DraftResult<String> {
        let entities = self
            .entities()
            .map(Entity::serialize)
            .collect::<DraftResult<Vec<_>>>()?;
        let file = DrawingFile {
            id: self.id.clone(),
            name: self.name.clone(),
            entities,
        };
        Ok(serde_json::to_string_pretty(&file)?)
    }

    /// Deserialize a drawing, resolving wall types through `registry`.
    pub fn from_json(json: &str, registry: &WallTypeRegistry) -> DraftResult<Self> {
        let file: DrawingFile = serde_json::from_str(json)?;
        let mut drawing = Drawing::new();
        drawing.id = file.id;
        drawing.name = file.name;
        for record in file.entities {
            drawing.add_entity(Entity::deserialize(record, registry)?);
        }
        Ok(drawing)
    }
}

fn is_pickable(entity: &Entity) -> bool {
    let props = entity.properties();
    props.visible && !props.locked
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{Circle, Line, Rectangle};

    fn v(x: f64, y: f64) -> Vector2 {
        Vector2::new(x, y)
    }

    #[test]
    fn test_add_and_remove() {
        let mut drawing = Drawing::new();
        let id = drawing.add_entity(Line::new(v(0.0, 0.0), v(1.0, 0.0)));
        assert_eq!(drawing.len(), 1);
        assert!(drawing.get(id).is_some());
        assert!(drawing.remove_entity(id).is_some());
        assert!(drawing.is_empty());
        assert_eq!(drawing.entities().count(), 0);
    }

    #[test]
    fn test_pick_prefers_front() {
        let mut drawing = Drawing::new();
        let back = drawing.add_entity(Rectangle::from_corners(v(0.0, 0.0), v(10.0, 10.0)));
        let front = drawing.add_entity(Line::new(v(0.0, 0.0), v(10.0, 0.0)));
        assert_eq!(drawing.pick(v(5.0, 0.0), 0.1), Some(front));
        drawing.bring_to_front(back);
        assert_eq!(drawing.pick(v(5.0, 0.0), 0.1), Some(back));
        assert_eq!(drawing.entities_at_point(v(5.0, 0.0), 0.1), vec![back, front]);
    }

    #[test]
    fn test_locked_and_hidden_not_pickable() {
        let mut drawing = Drawing::new();
        let id = drawing.add_entity(Circle::new(v(0.0, 0.0), 1.0));
        drawing.get_mut(id).unwrap().properties_mut().locked = true;
        assert!(drawing.pick(v(1.0, 0.0), 0.1).is_none());
        drawing.get_mut(id).unwrap().properties_mut().locked = false;
        drawing.get_mut(id).unwrap().properties_mut().visible = false;
        assert!(drawing.entities_in_rect(v(-2.0, -2.0), v(0.0, 0.0)).is_empty());
    }

    #[test]
    fn test_selection_helpers() {
        let mut drawing = Drawing::new();
        let a = drawing.add_entity(Line::new(v(0.0, 0.0), v(1.0, 0.0)));
        let b = drawing.add_entity(Line::new(v(0.0, 1.0), v(1.0, 1.0)));
        drawing.select_only(&[a]);
        assert_eq!(drawing.selected_ids(), vec![a]);
        drawing.toggle_selected(b);
        drawing.toggle_selected(a);
        assert_eq!(drawing.selected_ids(), vec![b]);
        drawing.get_mut(b).unwrap().properties_mut().locked = true;
        assert!(drawing.selected_unlocked_ids().is_empty());
    }

    #[test]
    fn test_undo_redo() {
        let mut drawing = Drawing::new();
        drawing.push_undo();
        let id = drawing.add_entity(Line::new(v(0.0, 0.0), v(1.0, 0.0)));
        assert!(drawing.undo());
        assert!(drawing.is_empty());
        assert!(drawing.redo());
        assert!(drawing.get(id).is_some());
        assert!(!drawing.redo());
    }

    #[test]
    fn test_undo_history_is_bounded() {
        let mut drawing = Drawing::new();
        for _ in 0..(MAX_UNDO_HISTORY + 10) {
            drawing.push_undo();
        }
        let mut count = 0;
        while drawing.undo() {
            count += 1;
        }
        assert_eq!(count, MAX_UNDO_HISTORY);
    }

    #[test]
    fn test_json_round_trip_keeps_order() {
        let registry = WallTypeRegistry::with_defaults();
        let mut drawing = Drawing::new();
        drawing.name = "Plan".to_string();
        let a = drawing.add_entity(Circle::new(v(1.0, 1.0), 2.0));
        let b = drawing.add_entity(Line::new(v(0.0, 0.0), v(1.0, 0.0)));
        let back = Drawing::from_json(&drawing.to_json().unwrap(), &registry).unwrap();
        assert_eq!(back.name, "Plan");
        assert_eq!(back.id, drawing.id);
        let ids: Vec<_> = back.entities().map(|e| e.id()).collect();
        assert_eq!(ids, vec![a, b]);
    }
}
