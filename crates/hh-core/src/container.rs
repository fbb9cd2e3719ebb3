//! The container engine.
//!
//! Every containment mutation goes through here. Insertion enforces, in
//! order and stopping at the first failure:
//!
//! 1. item count: the holder must have fewer items than its capacity;
//! 2. weight: the candidate's total weight plus the contents' total weight
//!    must not exceed the weight limit;
//! 3. size: both sets of dimensions are sorted largest first and each
//!    candidate extent must be strictly smaller than the holder's.
//!
//! Containment is ownership: an object lives in exactly one `Vec` at a time,
//! so moving it detaches it from its old holder.

use tracing::error;

use crate::object::{Dimensions, InstanceId, LiveObject, ObjectKind};

/// Item and weight limits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Capacity {
    /// Maximum number of directly held objects.
    pub items: usize,
    /// Maximum combined weight of the contents, in kilograms.
    pub weight_kg: f64,
}

impl Capacity {
    /// Limits of `items` objects and `weight_kg` kilograms.
    pub fn new(items: usize, weight_kg: f64) -> Self {
        Self { items, weight_kg }
    }

    /// No limits at all.
    pub fn unbounded() -> Self {
        Self::new(usize::MAX, f64::INFINITY)
    }
}

/// Storage for directly held objects, in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct Container {
    /// Limits checked on every insertion.
    pub capacity: Capacity,
    /// Held objects, oldest first.
    pub contents: Vec<LiveObject>,
}

impl Container {
    /// An empty container with the given limits.
    pub fn new(capacity: Capacity) -> Self {
        Self {
            capacity,
            contents: Vec::new(),
        }
    }

    /// An empty container that takes anything.
    pub fn unbounded() -> Self {
        Self::new(Capacity::unbounded())
    }

    /// Combined total weight of everything held.
    pub fn contents_weight(&self) -> f64 {
        self.contents.iter().map(LiveObject::total_weight).sum()
    }
}

/// Why an insertion was refused.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConstraintViolation {
    /// The would-be holder is neither a container nor a character.
    #[error("The {container} cannot hold anything.")]
    NotAContainer {
        /// Name of the would-be holder.
        container: String,
    },

    /// The holder already has as many items as it can take.
    #[error("The {container} is full ({limit} items), so the {object} will not fit.")]
    Capacity {
        /// Name of the holder.
        container: String,
        /// Name of the refused object.
        object: String,
        /// Item limit of the holder.
        limit: usize,
    },

    /// The object would push the contents past the weight limit.
    #[error("The {object} is too heavy for the {container} ({total:.2} kg of {limit:.2} kg).")]
    Weight {
        /// Name of the holder.
        container: String,
        /// Name of the refused object.
        object: String,
        /// Contents weight including the object, in kilograms.
        total: f64,
        /// Weight limit of the holder, in kilograms.
        limit: f64,
    },

    /// At least one extent of the object is not smaller than the holder's.
    #[error("The {object} is too big to fit in the {container}.")]
    Size {
        /// Name of the holder.
        container: String,
        /// Name of the refused object.
        object: String,
    },

    /// The object would end up inside itself.
    #[error("The {object} cannot be put inside itself.")]
    Cycle {
        /// Name of the object being moved.
        object: String,
    },
}

/// A refused insertion. The object is handed back so it is never lost.
#[derive(Debug)]
pub struct Rejected {
    /// The first check that failed.
    pub violation: ConstraintViolation,
    /// The object that was not inserted.
    pub object: Box<LiveObject>,
}

impl Rejected {
    /// Take back the refused object.
    pub fn into_object(self) -> LiveObject {
        *self.object
    }
}

/// Failure of a move between holders.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MoveError {
    /// The object to move is not in the source tree.
    #[error("object {0} is not here")]
    ObjectNotFound(InstanceId),

    /// The destination is not in the tree.
    #[error("destination {0} is not here")]
    TargetNotFound(InstanceId),

    /// The destination refused the object.
    #[error("{0}")]
    Constraint(#[from] ConstraintViolation),
}

/// The result of a nested search: the object and the holder it sits in
/// directly.
#[derive(Debug, Clone, Copy)]
pub struct Found<'a> {
    /// The matching object.
    pub object: &'a LiveObject,
    /// The holder the object sits in directly.
    pub owner: &'a LiveObject,
}

/// Where a detached object came from, so the detach can be undone.
struct Taken {
    owner: InstanceId,
    index: usize,
    object: LiveObject,
}

impl LiveObject {
    /// Container state for holders (containers and characters).
    pub fn container(&self) -> Option<&Container> {
        match &self.kind {
            ObjectKind::Container(c) => Some(c),
            ObjectKind::Character(ch) => Some(&ch.inventory),
            _ => None,
        }
    }

    /// Mutable container state for holders.
    pub fn container_mut(&mut self) -> Option<&mut Container> {
        match &mut self.kind {
            ObjectKind::Container(c) => Some(c),
            ObjectKind::Character(ch) => Some(&mut ch.inventory),
            _ => None,
        }
    }

    /// Whether this object can hold other objects.
    pub fn is_holder(&self) -> bool {
        self.container().is_some()
    }

    /// Directly held objects; empty for non-holders.
    pub fn contents(&self) -> &[LiveObject] {
        self.container().map(|c| c.contents.as_slice()).unwrap_or(&[])
    }

    /// Own weight plus the total weight of everything held, recursively.
    pub fn total_weight(&self) -> f64 {
        self.weight + self.contents().iter().map(LiveObject::total_weight).sum::<f64>()
    }

    /// Run the three insertion checks without mutating anything.
    pub fn check_insert(&self, object: &LiveObject) -> Result<(), ConstraintViolation> {
        let Some(container) = self.container() else {
            return Err(ConstraintViolation::NotAContainer {
                container: self.name.clone(),
            });
        };

        if container.contents.len() >= container.capacity.items {
            return Err(ConstraintViolation::Capacity {
                container: self.name.clone(),
                object: object.name.clone(),
                limit: container.capacity.items,
            });
        }

        let total = object.total_weight() + container.contents_weight();
        if total > container.capacity.weight_kg {
            return Err(ConstraintViolation::Weight {
                container: self.name.clone(),
                object: object.name.clone(),
                total,
                limit: container.capacity.weight_kg,
            });
        }

        // Characters carry their inventory rather than enclosing it.
        let carried = matches!(self.kind, ObjectKind::Character(_));
        if !carried && !fits_inside(&object.dimensions, &self.dimensions) {
            return Err(ConstraintViolation::Size {
                container: self.name.clone(),
                object: object.name.clone(),
            });
        }

        Ok(())
    }

    /// Insert `object` if all checks pass. On failure nothing changes and the
    /// object comes back inside the error.
    pub fn add(&mut self, object: LiveObject) -> Result<(), Rejected> {
        if let Err(violation) = self.check_insert(&object) {
            return Err(Rejected {
                violation,
                object: Box::new(object),
            });
        }
        match self.container_mut() {
            Some(container) => {
                container.contents.push(object);
                Ok(())
            }
            None => Err(Rejected {
                violation: ConstraintViolation::NotAContainer {
                    container: self.name.clone(),
                },
                object: Box::new(object),
            }),
        }
    }

    /// Detach a directly held object. Absent objects are not an error.
    pub fn remove(&mut self, instance: InstanceId) -> Option<LiveObject> {
        let container = self.container_mut()?;
        let pos = container.contents.iter().position(|o| o.instance == instance)?;
        Some(container.contents.remove(pos))
    }

    /// Drain every directly held object, in insertion order.
    pub fn remove_all(&mut self) -> Vec<LiveObject> {
        self.container_mut()
            .map(|c| std::mem::take(&mut c.contents))
            .unwrap_or_default()
    }

    /// Detach an object from anywhere below this one.
    pub fn detach(&mut self, instance: InstanceId) -> Option<LiveObject> {
        self.take(instance).map(|taken| taken.object)
    }

    fn take(&mut self, instance: InstanceId) -> Option<Taken> {
        let owner = self.instance;
        let container = self.container_mut()?;
        if let Some(index) = container.contents.iter().position(|o| o.instance == instance) {
            let object = container.contents.remove(index);
            return Some(Taken {
                owner,
                index,
                object,
            });
        }
        container.contents.iter_mut().find_map(|c| c.take(instance))
    }

    /// Undo a `take`, skipping the checks: the object was already there.
    fn put_back(&mut self, taken: Taken) {
        let Taken {
            owner,
            index,
            object,
        } = taken;
        match self.get_instance_mut(owner).and_then(|o| o.container_mut()) {
            Some(container) => {
                let index = index.min(container.contents.len());
                container.contents.insert(index, object);
            }
            None => error!(
                object = %object.instance,
                owner = %owner,
                "lost track of the original holder while undoing a move"
            ),
        }
    }

    /// Depth-first search below this object. Each object is tested before
    /// its own contents are searched.
    fn find_where<'a>(&'a self, matches: &dyn Fn(&LiveObject) -> bool) -> Option<Found<'a>> {
        for object in self.contents() {
            if matches(object) {
                return Some(Found {
                    object,
                    owner: self,
                });
            }
            if let Some(found) = object.find_where(matches) {
                return Some(found);
            }
        }
        None
    }

    /// Find an object by name or alias (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<Found<'_>> {
        self.find_where(&|o| o.answers_to(name))
    }

    /// Find the first object stamped from the record `id`.
    pub fn find_by_id(&self, id: &str) -> Option<Found<'_>> {
        self.find_where(&|o| o.id == id)
    }

    /// Find a specific instance below this object.
    pub fn find_instance(&self, instance: InstanceId) -> Option<Found<'_>> {
        self.find_where(&|o| o.instance == instance)
    }

    /// This object or any descendant with the given instance ID.
    pub fn get_instance(&self, instance: InstanceId) -> Option<&LiveObject> {
        if self.instance == instance {
            return Some(self);
        }
        self.find_instance(instance).map(|found| found.object)
    }

    /// Mutable access to this object or any descendant.
    pub fn get_instance_mut(&mut self, instance: InstanceId) -> Option<&mut LiveObject> {
        if self.instance == instance {
            return Some(self);
        }
        self.container_mut()?
            .contents
            .iter_mut()
            .find_map(|c| c.get_instance_mut(instance))
    }

    /// True if `instance` is held anywhere below this object.
    pub fn contains_instance(&self, instance: InstanceId) -> bool {
        self.find_instance(instance).is_some()
    }

    /// Instance IDs of everything below this object, depth first.
    pub fn descendants(&self) -> Vec<InstanceId> {
        let mut out = Vec::new();
        self.collect_descendants(&mut out);
        out
    }

    fn collect_descendants(&self, out: &mut Vec<InstanceId>) {
        for object in self.contents() {
            out.push(object.instance);
            object.collect_descendants(out);
        }
    }

    /// A flattened contents report. Each nested holder that has contents
    /// gets its own "<Name> contains:" header, indented one level deeper.
    pub fn list_contents(&self, prefix: &str) -> Vec<String> {
        let contents = self.contents();
        if contents.is_empty() {
            return vec![format!("{prefix}The {} is empty.", self.name)];
        }

        let mut lines = vec![format!("{prefix}{} contains:", capitalize(&self.name))];
        let inner = format!("{prefix}  ");

        let mut groups: Vec<(&str, usize)> = Vec::new();
        for object in contents {
            match groups.iter_mut().find(|(name, _)| *name == object.name) {
                Some((_, count)) => *count += 1,
                None => groups.push((object.name.as_str(), 1)),
            }
        }
        for (name, count) in groups {
            if count == 1 {
                lines.push(format!("{inner}{name}"));
            } else {
                lines.push(format!("{inner}{name} x{count}"));
            }
        }

        for object in contents {
            if !object.contents().is_empty() {
                lines.extend(object.list_contents(&inner));
            }
        }
        lines
    }
}

/// Largest-fits-largest: no rotation or shape modelling beyond sorting.
fn fits_inside(object: &Dimensions, holder: &Dimensions) -> bool {
    object
        .sorted_desc()
        .iter()
        .zip(holder.sorted_desc().iter())
        .all(|(o, h)| o < h)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Move an object between two separate holders (for example two location
/// roots). Either the move completes or both holders are left as they were.
pub fn transfer(
    from: &mut LiveObject,
    to: &mut LiveObject,
    instance: InstanceId,
) -> Result<(), MoveError> {
    let taken = from.take(instance).ok_or(MoveError::ObjectNotFound(instance))?;
    let Taken {
        owner,
        index,
        object,
    } = taken;
    match to.add(object) {
        Ok(()) => Ok(()),
        Err(rejected) => {
            let violation = rejected.violation.clone();
            from.put_back(Taken {
                owner,
                index,
                object: rejected.into_object(),
            });
            Err(violation.into())
        }
    }
}

/// Move an object to another holder inside the same tree.
///
/// `target` may be `root` itself. Moving an object into itself or into one
/// of its own descendants is refused as a cycle. Moving an object to the
/// holder it is already in is a no-op.
pub fn move_within(
    root: &mut LiveObject,
    instance: InstanceId,
    target: InstanceId,
) -> Result<(), MoveError> {
    let found = root
        .find_instance(instance)
        .ok_or(MoveError::ObjectNotFound(instance))?;
    if instance == target || found.object.contains_instance(target) {
        return Err(ConstraintViolation::Cycle {
            object: found.object.name.clone(),
        }
        .into());
    }
    if found.owner.instance == target {
        return Ok(());
    }
    if root.get_instance(target).is_none() {
        return Err(MoveError::TargetNotFound(target));
    }

    let taken = root.take(instance).ok_or(MoveError::ObjectNotFound(instance))?;
    let Taken {
        owner,
        index,
        object,
    } = taken;

    let result = match root.get_instance_mut(target) {
        Some(holder) => holder.add(object).map_err(|rejected| {
            let violation = rejected.violation.clone();
            (MoveError::Constraint(violation), rejected.into_object())
        }),
        None => Err((MoveError::TargetNotFound(target), object)),
    };

    result.map_err(|(err, object)| {
        root.put_back(Taken {
            owner,
            index,
            object,
        });
        err
    })
}
