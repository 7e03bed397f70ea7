//! This module is for testing only

use std::cell::Cell;
use std::rc::Rc;

/// Shared counter of how many `Tracked` values were dropped.
pub type DropFlag = Rc<Cell<usize>>;

pub fn new_flag() -> DropFlag {
    Rc::new(Cell::new(0))
}

/// Payload that reports its destruction to a shared `DropFlag`.
#[derive(Debug)]
pub struct Tracked {
    pub value: i32,
    pub dropflag: DropFlag,
}

impl Tracked {
    pub fn new(value: i32, dropflag: &DropFlag) -> Tracked {
        Tracked { value, dropflag: dropflag.clone() }
    }
}

impl Clone for Tracked {
    fn clone(&self) -> Self {
        Tracked::new(self.value, &self.dropflag)
    }
}

impl PartialEq for Tracked {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.dropflag.set(self.dropflag.get() + 1);
    }
}

/// Payload whose `drop` counts itself and then panics if `panics` is set.
#[derive(Debug)]
pub struct Exploding {
    pub panics: bool,
    pub dropflag: DropFlag,
}

impl Exploding {
    pub fn new(panics: bool, dropflag: &DropFlag) -> Exploding {
        Exploding { panics, dropflag: dropflag.clone() }
    }
}

impl Drop for Exploding {
    fn drop(&mut self) {
        self.dropflag.set(self.dropflag.get() + 1);
        if self.panics {
            panic!("exploding block dropped");
        }
    }
}

#[test]
fn dropflag() {
    let flag = new_flag();
    let tracked = Tracked::new(1, &flag);
    let copy = tracked.clone();
    assert_eq!(0, flag.get());
    std::mem::drop(tracked);
    assert_eq!(1, flag.get());
    std::mem::drop(copy);
    assert_eq!(2, flag.get());
}
