//! Observable view models.
//!
//! Each page writes its display state into [`ViewCell`]s; the front end
//! subscribes and mirrors changes into its own reactive system.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

type Observer<T> = Box<dyn Fn(&T)>;

struct Inner<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<Observer<T>>>,
}

/// Shared, observable value. Clones point at the same value.
///
/// Observers are called synchronously after every write and must not write
/// back into the same cell.
pub struct ViewCell<T> {
    inner: Rc<Inner<T>>,
}

impl<T> Clone for ViewCell<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Default> Default for ViewCell<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for ViewCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ViewCell")
            .field(&*self.inner.value.borrow())
            .finish()
    }
}

impl<T> ViewCell<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(Inner {
                value: RefCell::new(value),
                observers: RefCell::new(Vec::new()),
            }),
        }
    }

    /// Read the current value.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.value.borrow())
    }

    /// Mutate the value in place, then notify observers.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        f(&mut self.inner.value.borrow_mut());
        self.notify();
    }

    /// Replace the value, then notify observers.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify();
    }

    /// Call `observer` now with the current value and after every write.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) {
        observer(&self.inner.value.borrow());
        self.inner.observers.borrow_mut().push(Box::new(observer));
    }

    fn notify(&self) {
        let value = self.inner.value.borrow();
        for observer in self.inner.observers.borrow().iter() {
            observer(&value);
        }
    }
}

impl<T: Clone> ViewCell<T> {
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }
}
