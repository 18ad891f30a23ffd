//! A small retained scene that implements [`CalibrationHost`] on top of
//! `embedded-graphics`, for panels without a full UI toolkit.
//!
//! The scene keeps screens and their children in a fixed arena, runs axis
//! animations from [`Scene::tick`], and paints the active screen with
//! [`Scene::draw`].

use embassy_time::Instant;
use embedded_graphics::prelude::{Point, Size};
use heapless::{String, Vec};

use crate::{
    config::{SCENE_LABEL_TEXT_MAX, SCENE_MAX_OBJECTS},
    host::{AxisAnimation, CalibrationHost, LabelAlign},
};

mod animation;
mod draw;
mod framebuffer;
#[cfg(test)]
mod tests;

use animation::AnimationScheduler;
pub use framebuffer::Framebuffer;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SceneError {
    ObjectsExhausted,
    UnknownObject,
}

impl core::fmt::Display for SceneError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SceneError::ObjectsExhausted => f.write_str("scene object arena is full"),
            SceneError::UnknownObject => f.write_str("unknown or deleted scene object"),
        }
    }
}

impl core::error::Error for SceneError {}

/// Handle to a screen or an object in a [`Scene`].
///
/// Handles go stale when their object is deleted; stale handles are ignored.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectId {
    index: u8,
    generation: u8,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ObjectKind {
    Screen,
    HitSurface,
    Label {
        text: String<SCENE_LABEL_TEXT_MAX>,
        align: LabelAlign,
    },
    Target {
        diameter: u32,
    },
}

#[derive(Clone, Debug)]
pub(crate) struct SceneObject {
    pub(crate) kind: ObjectKind,
    pub(crate) parent: Option<u8>,
    pub(crate) position: Point,
    pub(crate) hidden: bool,
    pub(crate) z: u16,
}

#[derive(Clone, Debug, Default)]
struct Slot {
    generation: u8,
    object: Option<SceneObject>,
}

pub struct Scene {
    size: Size,
    slots: Vec<Slot, SCENE_MAX_OBJECTS>,
    home: ObjectId,
    active: ObjectId,
    next_z: u16,
    animations: AnimationScheduler,
    now: Instant,
}

impl Scene {
    /// A scene with one empty home screen, already active.
    pub fn new(size: Size) -> Self {
        let mut slots = Vec::new();
        let _ = slots.push(Slot {
            generation: 0,
            object: Some(SceneObject {
                kind: ObjectKind::Screen,
                parent: None,
                position: Point::zero(),
                hidden: false,
                z: 0,
            }),
        });
        let home = ObjectId {
            index: 0,
            generation: 0,
        };
        Self {
            size,
            slots,
            home,
            active: home,
            next_z: 1,
            animations: AnimationScheduler::new(),
            now: Instant::from_ticks(0),
        }
    }

    pub fn home_screen(&self) -> ObjectId {
        self.home
    }

    pub fn now(&self) -> Instant {
        self.now
    }

    /// Advances time and applies running animations.
    pub fn tick(&mut self, now: Instant) {
        self.now = now;
        for (animation, value) in self.animations.step(now) {
            animation.apply(self, value);
        }
    }

    pub fn animations_running(&self) -> usize {
        self.animations.len()
    }

    pub fn object_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.object.is_some()).count()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.get(id).is_some()
    }

    pub fn label_text(&self, id: ObjectId) -> Option<&str> {
        match &self.get(id)?.kind {
            ObjectKind::Label { text, .. } => Some(text.as_str()),
            _ => None,
        }
    }

    pub fn is_hidden(&self, id: ObjectId) -> Option<bool> {
        self.get(id).map(|object| object.hidden)
    }

    /// Topmost visible hit surface on the active screen containing `point`.
    pub fn hit_test(&self, point: Point) -> Option<ObjectId> {
        let inside = point.x >= 0
            && point.y >= 0
            && (point.x as u32) < self.size.width
            && (point.y as u32) < self.size.height;
        if !inside {
            return None;
        }
        let children = self.children(self.active);
        children.iter().rev().copied().find(|id| {
            self.get(*id).is_some_and(|object| {
                !object.hidden && matches!(object.kind, ObjectKind::HitSurface)
            })
        })
    }

    /// Children of `screen`, back to front.
    pub(crate) fn children(&self, screen: ObjectId) -> Vec<ObjectId, SCENE_MAX_OBJECTS> {
        let mut out: Vec<(u16, ObjectId), SCENE_MAX_OBJECTS> = Vec::new();
        if self.get(screen).is_none() {
            return Vec::new();
        }
        for (index, slot) in self.slots.iter().enumerate() {
            if let Some(object) = &slot.object {
                if object.parent == Some(screen.index) {
                    let _ = out.push((
                        object.z,
                        ObjectId {
                            index: index as u8,
                            generation: slot.generation,
                        },
                    ));
                }
            }
        }
        out.sort_unstable_by_key(|(z, _)| *z);
        out.into_iter().map(|(_, id)| id).collect()
    }

    pub(crate) fn get(&self, id: ObjectId) -> Option<&SceneObject> {
        let slot = self.slots.get(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_ref()
    }

    fn get_mut(&mut self, id: ObjectId) -> Option<&mut SceneObject> {
        let slot = self.slots.get_mut(id.index as usize)?;
        if slot.generation != id.generation {
            return None;
        }
        slot.object.as_mut()
    }

    fn insert(&mut self, kind: ObjectKind, parent: Option<ObjectId>) -> Result<ObjectId, SceneError> {
        let parent = match parent {
            Some(parent) => {
                if self.get(parent).is_none() {
                    return Err(SceneError::UnknownObject);
                }
                Some(parent.index)
            }
            None => None,
        };
        let object = SceneObject {
            kind,
            parent,
            position: Point::zero(),
            hidden: false,
            z: self.bump_z(),
        };

        if let Some(index) = self.slots.iter().position(|slot| slot.object.is_none()) {
            let slot = &mut self.slots[index];
            slot.object = Some(object);
            return Ok(ObjectId {
                index: index as u8,
                generation: slot.generation,
            });
        }

        let index = self.slots.len() as u8;
        self.slots
            .push(Slot {
                generation: 0,
                object: Some(object),
            })
            .map_err(|_| SceneError::ObjectsExhausted)?;
        Ok(ObjectId {
            index,
            generation: 0,
        })
    }

    fn remove(&mut self, id: ObjectId) {
        if let Some(slot) = self.slots.get_mut(id.index as usize) {
            if slot.generation == id.generation && slot.object.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
            }
        }
        self.animations.cancel(id);
    }

    fn bump_z(&mut self) -> u16 {
        let z = self.next_z;
        self.next_z = self.next_z.saturating_add(1);
        z
    }

    /// Origin an object is drawn at; centred labels ignore their position.
    pub(crate) fn origin(&self, object: &SceneObject) -> Point {
        match &object.kind {
            ObjectKind::Label {
                text,
                align: LabelAlign::Center,
            } => {
                let size = draw::text_size(text);
                Point::new(
                    (self.size.width as i32 - size.width as i32) / 2,
                    (self.size.height as i32 - size.height as i32) / 2,
                )
            }
            _ => object.position,
        }
    }
}

impl CalibrationHost for Scene {
    type Screen = ObjectId;
    type Object = ObjectId;
    type Error = SceneError;

    fn display_size(&self) -> Size {
        self.size
    }

    fn active_screen(&self) -> ObjectId {
        self.active
    }

    fn create_screen(&mut self) -> Result<ObjectId, SceneError> {
        self.insert(ObjectKind::Screen, None)
    }

    fn load_screen(&mut self, screen: ObjectId) {
        if self.get(screen).is_some() {
            self.active = screen;
        } else {
            log::warn!("scene: load of unknown screen {:?}", screen);
        }
    }

    fn delete_screen(&mut self, screen: ObjectId) {
        if screen == self.home {
            log::warn!("scene: home screen cannot be deleted");
            return;
        }
        for child in self.children(screen) {
            self.remove(child);
        }
        self.remove(screen);
    }

    fn create_hit_surface(&mut self, screen: ObjectId) -> Result<ObjectId, SceneError> {
        self.insert(ObjectKind::HitSurface, Some(screen))
    }

    fn create_label(&mut self, screen: ObjectId, align: LabelAlign) -> Result<ObjectId, SceneError> {
        self.insert(
            ObjectKind::Label {
                text: String::new(),
                align,
            },
            Some(screen),
        )
    }

    fn create_target(&mut self, screen: ObjectId, diameter: u32) -> Result<ObjectId, SceneError> {
        self.insert(ObjectKind::Target { diameter }, Some(screen))
    }

    fn set_label_text(&mut self, label: ObjectId, text: &str) {
        if let Some(SceneObject {
            kind: ObjectKind::Label { text: stored, .. },
            ..
        }) = self.get_mut(label)
        {
            stored.clear();
            for ch in text.chars() {
                if stored.push(ch).is_err() {
                    break;
                }
            }
        }
    }

    fn object_size(&mut self, object: ObjectId) -> Size {
        let Some(found) = self.get(object) else {
            return Size::zero();
        };
        match &found.kind {
            ObjectKind::Screen | ObjectKind::HitSurface => self.size,
            ObjectKind::Label { text, .. } => draw::text_size(text),
            ObjectKind::Target { diameter } => Size::new(*diameter, *diameter),
        }
    }

    fn position(&self, object: ObjectId) -> Point {
        self.get(object)
            .map(|found| self.origin(found))
            .unwrap_or_default()
    }

    fn set_position(&mut self, object: ObjectId, position: Point) {
        if let Some(found) = self.get_mut(object) {
            found.position = position;
        }
    }

    fn set_hidden(&mut self, object: ObjectId, hidden: bool) {
        if let Some(found) = self.get_mut(object) {
            found.hidden = hidden;
        }
    }

    fn move_foreground(&mut self, object: ObjectId) {
        if self.get(object).is_some() {
            let z = self.bump_z();
            if let Some(found) = self.get_mut(object) {
                found.z = z;
            }
        }
    }

    fn animate(&mut self, animation: AxisAnimation<ObjectId>) {
        if self.get(animation.object).is_none() {
            return;
        }
        if let Err(animation) = self.animations.start(animation, self.now) {
            log::warn!("scene: animation slots full, jumping to end value");
            animation.apply(self, animation.to);
        }
    }
}
