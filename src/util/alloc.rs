#![cfg(test)]

use std::cell::RefCell;
use std::ops::Deref;
use std::rc::Rc;

/// A value that counts how many times it (or any of its clones) has been dropped.
#[derive(Debug, Clone)]
pub struct CountedDrop(pub Rc<RefCell<usize>>);

impl CountedDrop {
    pub fn new(value: usize) -> CountedDrop {
        CountedDrop(Rc::new(RefCell::new(value)))
    }

    pub fn drops(&self) -> usize {
        *self.0.borrow()
    }
}

impl Deref for CountedDrop {
    type Target = Rc<RefCell<usize>>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Drop for CountedDrop {
    fn drop(&mut self) {
        self.0.replace_with(|v| *v + 1);
    }
}

/// A value whose [`Clone`] implementation panics once a shared budget of clones runs out.
#[derive(Debug)]
pub struct PanicOnClone {
    pub value: usize,
    pub budget: Rc<RefCell<usize>>,
}

impl Clone for PanicOnClone {
    fn clone(&self) -> Self {
        let mut budget = self.budget.borrow_mut();
        if *budget == 0 {
            panic!("clone budget exhausted");
        }
        *budget -= 1;
        PanicOnClone {
            value: self.value,
            budget: self.budget.clone(),
        }
    }
}
