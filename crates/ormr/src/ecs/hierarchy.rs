//! # Hierarchy — Parent/Child Relationships
//!
//! Entities form trees through a pair of reactive components:
//!
//! ```text
//!        root
//!       /    \
//!   child1  child2          Parent(root) on child1, child2
//!     |                     Children[child1, child2] on root
//!   leaf                    Parent(child1) on leaf
//! ```
//!
//! [`Parent`] is the authoritative edge; [`Children`] is a derived reverse
//! index maintained entirely by `Parent`'s attach/detach hooks. User code
//! never edits `Children` directly — it goes through [`World::set_parent`]
//! and [`World::remove_parent`], and the two components can't drift apart.
//!
//! ## Comparison
//!
//! `bevy_ecs` maintains the same invariant through relationship hooks on its
//! `ChildOf` component; the shape here is the same, minus the archetype
//! machinery.

use super::component::Component;
use super::entity::Entity;
use super::world::World;

/// Points at the entity's parent. Attach/detach hooks keep the parent's
/// [`Children`] list in sync, so re-parenting is just replacing this
/// component.
///
/// Prefer [`World::set_parent`], which rejects edges that would form a
/// cycle. Attaching `Parent` raw skips that check, and a cyclic chain makes
/// the upward walks (trigger bubbling, recursive despawn) non-terminating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Parent(pub Entity);

impl Component for Parent {
    fn on_attach(world: &mut World, entity: Entity) {
        let Some(&Parent(parent)) = world.get::<Parent>(entity) else {
            return;
        };
        // A dead parent must not get a Children row; nothing would ever
        // clean it out of the store again.
        if !world.is_alive(parent) {
            return;
        }
        if !world.has::<Children>(parent) {
            world.insert_component(parent, Children::default());
        }
        if let Some(children) = world.get_mut::<Children>(parent) {
            if !children.0.contains(&entity) {
                children.0.push(entity);
            }
        }
    }

    fn on_detach(world: &mut World, entity: Entity) {
        let Some(&Parent(parent)) = world.get::<Parent>(entity) else {
            return;
        };
        if let Some(children) = world.get_mut::<Children>(parent) {
            children.0.retain(|&child| child != entity);
        }
    }
}

/// Derived child list, in attachment order. Maintained by [`Parent`]'s
/// hooks — the field is private so it can only be read.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Children(Vec<Entity>);

impl Children {
    pub fn as_slice(&self) -> &[Entity] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = Entity> + '_ {
        self.0.iter().copied()
    }
}

impl Component for Children {}

impl World {
    /// Makes `parent` the parent of `child`, detaching any previous edge
    /// first. Fails if either entity is unknown or already flushed, or if the
    /// edge would make `child` its own ancestor.
    pub fn set_parent(&mut self, child: Entity, parent: Entity) -> Result<(), crate::error::EcsError> {
        if !self.is_alive(parent) {
            return Err(crate::error::EcsError::InvalidEntity(parent));
        }
        // Walk up from the prospective parent; finding the child (or the
        // child *being* the parent) means a cycle, which would make the
        // bubble and despawn walks non-terminating.
        let mut ancestor = Some(parent);
        while let Some(entity) = ancestor {
            if entity == child {
                return Err(crate::error::EcsError::HierarchyCycle { child, parent });
            }
            ancestor = self.parent_of(entity);
        }
        // Replacement would fire the detach hook anyway; going through the
        // explicit remove keeps a single code path for edge teardown.
        self.remove_component::<Parent>(child)?;
        self.add_component(child, Parent(parent))
    }

    /// Detaches `child` from its parent, if it has one.
    pub fn remove_parent(&mut self, child: Entity) -> Result<(), crate::error::EcsError> {
        self.remove_component::<Parent>(child)
    }

    pub fn parent_of(&self, entity: Entity) -> Option<Entity> {
        self.get::<Parent>(entity).map(|&Parent(parent)| parent)
    }

    /// The entity's children in attachment order. Leaf entities yield the
    /// empty slice.
    pub fn children_of(&self, entity: Entity) -> &[Entity] {
        self.get::<Children>(entity)
            .map(Children::as_slice)
            .unwrap_or(&[])
    }

    /// Queues the entity and its entire subtree for destruction. Like
    /// [`World::destroy`] this is deferred; the subtree is walked now, so
    /// re-parenting after the call doesn't rescue a descendant.
    pub fn despawn_recursive(&mut self, entity: Entity) {
        let children: Vec<Entity> = self.children_of(entity).to_vec();
        for child in children {
            self.despawn_recursive(child);
        }
        self.destroy(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Name(&'static str);
    impl Component for Name {}

    #[test]
    fn set_parent_maintains_children_list() {
        let mut world = World::new();
        let root = world.create_entity();
        let a = world.create_entity();
        let b = world.create_entity();

        world.set_parent(a, root).unwrap();
        world.set_parent(b, root).unwrap();

        assert_eq!(world.parent_of(a), Some(root));
        assert_eq!(world.children_of(root), &[a, b]);
        assert_eq!(world.children_of(a), &[] as &[Entity]);
    }

    #[test]
    fn reparent_moves_between_children_lists() {
        let mut world = World::new();
        let old_parent = world.create_entity();
        let new_parent = world.create_entity();
        let child = world.create_entity();

        world.set_parent(child, old_parent).unwrap();
        world.set_parent(child, new_parent).unwrap();

        assert_eq!(world.parent_of(child), Some(new_parent));
        assert_eq!(world.children_of(old_parent), &[] as &[Entity]);
        assert_eq!(world.children_of(new_parent), &[child]);
    }

    #[test]
    fn raw_parent_replacement_also_moves_the_edge() {
        // Attaching Parent directly (not via set_parent) must behave the
        // same: replacement fires the old edge's detach hook first.
        let mut world = World::new();
        let first = world.create_entity();
        let second = world.create_entity();
        let child = world.create_entity();

        world.add_component(child, Parent(first)).unwrap();
        world.add_component(child, Parent(second)).unwrap();

        assert_eq!(world.children_of(first), &[] as &[Entity]);
        assert_eq!(world.children_of(second), &[child]);
    }

    #[test]
    fn remove_parent_detaches_the_edge() {
        let mut world = World::new();
        let parent = world.create_entity();
        let child = world.create_entity();

        world.set_parent(child, parent).unwrap();
        world.remove_parent(child).unwrap();

        assert_eq!(world.parent_of(child), None);
        assert!(world.children_of(parent).is_empty());
        // A second removal is a silent no-op.
        world.remove_parent(child).unwrap();
    }

    #[test]
    fn set_parent_rejects_cycles() {
        use crate::error::EcsError;

        let mut world = World::new();
        let a = world.create_entity();
        let b = world.create_entity();
        let c = world.create_entity();
        world.set_parent(b, a).unwrap();
        world.set_parent(c, b).unwrap();

        assert_eq!(
            world.set_parent(a, a),
            Err(EcsError::HierarchyCycle { child: a, parent: a })
        );
        assert_eq!(
            world.set_parent(a, c),
            Err(EcsError::HierarchyCycle { child: a, parent: c })
        );

        // The rejected calls left the existing edges untouched.
        assert_eq!(world.parent_of(a), None);
        assert_eq!(world.children_of(a), &[b]);
        assert_eq!(world.children_of(b), &[c]);
    }

    #[test]
    fn set_parent_to_dead_entity_fails() {
        let mut world = World::new();
        let parent = world.create_entity();
        let child = world.create_entity();
        world.destroy(parent);
        world.flush_destroyed();

        assert!(world.set_parent(child, parent).is_err());
        assert_eq!(world.parent_of(child), None);
    }

    #[test]
    fn raw_parent_to_dead_entity_leaves_no_children_row() {
        let mut world = World::new();
        let dead = world.create_entity();
        world.destroy(dead);
        world.flush_destroyed();

        let child = world.create_entity();
        world.add_component(child, Parent(dead)).unwrap();

        // The edge dangles by design, but no Children storage may appear
        // for an entity the flush can never reach again.
        assert_eq!(world.parent_of(child), Some(dead));
        assert_eq!(world.components_of::<Children>().count(), 0);
        assert_eq!(world.children_of(dead), &[] as &[Entity]);
    }

    #[test]
    fn despawn_recursive_removes_whole_subtree() {
        let mut world = World::new();
        let root = world.create_entity();
        let mid = world.create_entity();
        let leaf = world.create_entity();
        let bystander = world.create_entity();
        world.set_parent(mid, root).unwrap();
        world.set_parent(leaf, mid).unwrap();

        world.despawn_recursive(root);
        world.flush_destroyed();

        assert!(!world.is_alive(root));
        assert!(!world.is_alive(mid));
        assert!(!world.is_alive(leaf));
        assert!(world.is_alive(bystander));
    }

    #[test]
    fn destroy_flush_unlinks_child_from_surviving_parent() {
        let mut world = World::new();
        let parent = world.create_entity();
        let child = world.create_entity();
        world.set_parent(child, parent).unwrap();

        world.destroy(child);
        world.flush_destroyed();

        assert!(world.is_alive(parent));
        assert!(world.children_of(parent).is_empty());
    }

    #[test]
    fn named_tree_walk() {
        let mut world = World::new();
        let root = world.create_entity();
        world.add_component(root, Name("root")).unwrap();
        let child = world.create_entity();
        world.add_component(child, Name("child")).unwrap();
        world.set_parent(child, root).unwrap();

        let mut names = Vec::new();
        let mut current = Some(child);
        while let Some(entity) = current {
            names.push(world.get::<Name>(entity).unwrap().0);
            current = world.parent_of(entity);
        }
        assert_eq!(names, vec!["child", "root"]);
    }
}
