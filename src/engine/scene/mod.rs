//! The scene's display list.

pub mod object;

pub use object::{GameObject, ObjectId, ObjectKind};

use glam::Vec2;
use log::debug;

/// Canvas size the scene is laid out in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleSize {
    pub width: f32,
    pub height: f32,
}

impl ScaleSize {
    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

pub struct Scene {
    scale: ScaleSize,
    objects: Vec<(ObjectId, GameObject)>,
    next_id: u64,
}

impl Scene {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            scale: ScaleSize {
                width: width as f32,
                height: height as f32,
            },
            objects: Vec::new(),
            next_id: 0,
        }
    }

    pub fn scale(&self) -> ScaleSize {
        self.scale
    }

    pub fn add(&mut self, object: GameObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        debug!("[scene] Added {:?} {:?}", id, object.kind);
        self.objects.push((id, object));
        id
    }

    /// Removes an object. Unknown ids are ignored.
    pub fn destroy(&mut self, id: ObjectId) -> Option<GameObject> {
        let index = self.objects.iter().position(|(other, _)| *other == id)?;
        debug!("[scene] Destroyed {:?}", id);
        Some(self.objects.remove(index).1)
    }

    pub fn get(&self, id: ObjectId) -> Option<&GameObject> {
        self.objects
            .iter()
            .find(|(other, _)| *other == id)
            .map(|(_, object)| object)
    }

    pub fn get_mut(&mut self, id: ObjectId) -> Option<&mut GameObject> {
        self.objects
            .iter_mut()
            .find(|(other, _)| *other == id)
            .map(|(_, object)| object)
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    /// Objects in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ObjectId, &GameObject)> {
        self.objects.iter().map(|(id, object)| (*id, object))
    }

    /// Visible objects back to front: ascending depth, then insertion order.
    pub fn display_list(&self) -> Vec<&GameObject> {
        let mut list: Vec<&GameObject> = self
            .objects
            .iter()
            .map(|(_, object)| object)
            .filter(|object| object.visible)
            .collect();
        list.sort_by(|a, b| a.depth.total_cmp(&b.depth));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::color::Color;

    fn rect(depth: f32) -> GameObject {
        GameObject::rectangle(Vec2::ZERO, Vec2::ONE, Color::WHITE).with_depth(depth)
    }

    #[test]
    fn ids_are_not_reused() {
        let mut scene = Scene::new(10, 10);
        let a = scene.add(rect(0.0));
        scene.destroy(a);
        let b = scene.add(rect(0.0));
        assert_ne!(a, b);
        assert!(!scene.contains(a));
        assert!(scene.contains(b));
    }

    #[test]
    fn destroying_unknown_id_is_a_no_op() {
        let mut scene = Scene::new(10, 10);
        let a = scene.add(rect(0.0));
        assert!(scene.destroy(a).is_some());
        assert!(scene.destroy(a).is_none());
        assert!(scene.is_empty());
    }

    #[test]
    fn display_list_orders_by_depth_then_insertion() {
        let mut scene = Scene::new(10, 10);
        scene.add(rect(0.0).with_origin(Vec2::new(0.0, 0.1)));
        scene.add(rect(f32::MIN));
        scene.add(rect(0.0).with_origin(Vec2::new(0.0, 0.2)));
        let mut hidden = rect(-1.0);
        hidden.visible = false;
        scene.add(hidden);

        let list = scene.display_list();
        assert_eq!(list.len(), 3);
        assert_eq!(list[0].depth, f32::MIN);
        assert_eq!(list[1].origin.y, 0.1);
        assert_eq!(list[2].origin.y, 0.2);
    }

    #[test]
    fn scale_center() {
        let scene = Scene::new(800, 600);
        assert_eq!(scene.scale().center(), Vec2::new(400.0, 300.0));
    }
}
