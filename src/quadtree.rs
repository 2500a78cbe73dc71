/*
 * Quadtree Module
 *
 * This module defines the region quadtree used for neighbor lookups. The tree
 * covers the arena rectangle and buckets entities by position: a leaf holds up
 * to `max_objects` entities and splits into four equal quadrants when one more
 * arrives. Nodes live in a flat arena (`Vec<Node>`) and refer to their
 * children by index, so the tree owns no boxed children and drops in one go.
 *
 * A tree is built from scratch every frame and never shrinks; nodes are never
 * merged back. Division stops at `max_depth` or when a quadrant would fall
 * below `MIN_CELL_SIZE`, in which case the deepest leaf simply keeps the extra
 * entities. Without that guard a pile of entities sharing one point would
 * divide forever.
 */

use tracing::trace;

use crate::bounds::Rect;
use crate::renderer::Renderer;
use crate::vector::Vector;

pub const DEFAULT_MAX_OBJECTS: usize = 5;
pub const DEFAULT_MAX_DEPTH: u32 = 10;
// Smallest quadrant edge, in arena units, the tree will create
pub const MIN_CELL_SIZE: f32 = 1.0;

const ROOT: NodeId = NodeId(0);

// Anything that can be stored in the tree
pub trait Located {
    fn position(&self) -> Vector;
}

impl Located for Vector {
    fn position(&self) -> Vector {
        *self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(usize);

#[derive(Debug, Clone, PartialEq)]
enum NodeKind<T> {
    Leaf(Vec<T>),
    // top-left, top-right, bottom-left, bottom-right
    Divided([NodeId; 4]),
}

#[derive(Debug, Clone, PartialEq)]
struct Node<T> {
    rect: Rect,
    depth: u32,
    kind: NodeKind<T>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct QuadTree<T> {
    nodes: Vec<Node<T>>,
    max_objects: usize,
    max_depth: u32,
}

impl<T: Located + Clone> QuadTree<T> {
    pub fn new(bounds: Rect, max_objects: usize, max_depth: u32) -> Self {
        Self {
            nodes: vec![Node {
                rect: bounds,
                depth: 0,
                kind: NodeKind::Leaf(Vec::with_capacity(max_objects)),
            }],
            // a zero capacity would divide on every insert
            max_objects: max_objects.max(1),
            max_depth,
        }
    }

    pub fn bounds(&self) -> Rect {
        self.nodes[ROOT.0].rect
    }

    // Insert an entity keyed by its current position.
    // Returns false when the position lies outside the tree and the entity was dropped.
    pub fn insert(&mut self, entity: T) -> bool {
        self.insert_at(ROOT, entity)
    }

    fn insert_at(&mut self, id: NodeId, entity: T) -> bool {
        let node = &self.nodes[id.0];
        match &node.kind {
            NodeKind::Divided(children) => {
                // Every child gets the offer; each keeps it only if it contains the position
                let children = *children;
                let mut kept = false;
                for child in children {
                    kept |= self.insert_at(child, entity.clone());
                }
                kept
            }
            NodeKind::Leaf(objects) => {
                if !node.rect.contains(&entity.position()) {
                    return false;
                }
                if objects.len() < self.max_objects || !self.can_divide(node) {
                    if let NodeKind::Leaf(objects) = &mut self.nodes[id.0].kind {
                        objects.push(entity);
                    }
                    true
                } else {
                    self.divide(id);
                    self.insert_at(id, entity)
                }
            }
        }
    }

    fn can_divide(&self, node: &Node<T>) -> bool {
        node.depth < self.max_depth
            && node.rect.width / 2.0 >= MIN_CELL_SIZE
            && node.rect.height / 2.0 >= MIN_CELL_SIZE
    }

    // Split a leaf into four quadrants and hand its objects down to them
    fn divide(&mut self, id: NodeId) {
        let (rect, depth) = {
            let node = &self.nodes[id.0];
            if matches!(node.kind, NodeKind::Divided(_)) {
                return;
            }
            (node.rect, node.depth)
        };

        let mut children = [ROOT; 4];
        for (slot, quadrant) in children.iter_mut().zip(rect.quadrants()) {
            *slot = NodeId(self.nodes.len());
            self.nodes.push(Node {
                rect: quadrant,
                depth: depth + 1,
                kind: NodeKind::Leaf(Vec::with_capacity(self.max_objects)),
            });
        }

        let objects = match std::mem::replace(&mut self.nodes[id.0].kind, NodeKind::Divided(children)) {
            NodeKind::Leaf(objects) => objects,
            NodeKind::Divided(_) => Vec::new(),
        };
        trace!(depth, objects = objects.len(), "dividing quadtree node");

        // Each child re-filters the parent's list through its own boundary check
        for child in children {
            for object in &objects {
                self.insert_at(child, object.clone());
            }
        }
    }

    // Objects sharing a leaf with `point`; empty when the point is outside the tree
    pub fn query(&self, point: &Vector) -> &[T] {
        let mut id = ROOT;
        if !self.nodes[id.0].rect.contains(point) {
            return &[];
        }

        loop {
            match &self.nodes[id.0].kind {
                NodeKind::Leaf(objects) => return objects,
                NodeKind::Divided(children) => {
                    match children.iter().find(|child| self.nodes[child.0].rect.contains(point)) {
                        Some(child) => id = *child,
                        None => return &[],
                    }
                }
            }
        }
    }

    // Same as `query`, keyed by an entity's position
    pub fn query_entity(&self, entity: &T) -> &[T] {
        self.query(&entity.position())
    }

    // Objects within `radius` of `center`, gathered from every leaf the circle touches
    pub fn query_radius(&self, center: &Vector, radius: f32) -> Vec<&T> {
        let radius_sq = radius * radius;
        let mut found = Vec::new();
        let mut stack = vec![ROOT];

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id.0];
            if !node.rect.intersects_circle(center, radius) {
                continue;
            }
            match &node.kind {
                NodeKind::Divided(children) => stack.extend(children.iter().rev()),
                NodeKind::Leaf(objects) => {
                    for object in objects {
                        let p = object.position();
                        let dx = p.x - center.x;
                        let dy = p.y - center.y;
                        if dx * dx + dy * dy <= radius_sq {
                            found.push(object);
                        }
                    }
                }
            }
        }

        found
    }

    // Leaf rectangles with their contents, in depth-first order
    pub fn leaves(&self) -> impl Iterator<Item = (Rect, &[T])> + '_ {
        self.nodes.iter().filter_map(|node| match &node.kind {
            NodeKind::Leaf(objects) => Some((node.rect, objects.as_slice())),
            NodeKind::Divided(_) => None,
        })
    }

    // Rectangle of every node, divided ones included
    pub fn regions(&self) -> impl Iterator<Item = Rect> + '_ {
        self.nodes.iter().map(|node| node.rect)
    }

    pub fn len(&self) -> usize {
        self.leaves().map(|(_, objects)| objects.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn depth(&self) -> u32 {
        self.nodes.iter().map(|node| node.depth).max().unwrap_or(0)
    }

    // Debug overlay: hand every node rectangle to the renderer
    pub fn draw<R: Renderer + ?Sized>(&self, renderer: &mut R) {
        for rect in self.regions() {
            renderer.draw_region(rect);
        }
    }
}
