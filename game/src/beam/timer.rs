use crate::beam::world::DeferredTimer;
use fyrox::core::pool::{Handle, Pool};

#[derive(Clone, Debug, PartialEq)]
pub struct DeferredTask {
    remaining: f32,
}

pub type TimerHandle = Handle<DeferredTask>;

#[derive(Clone, Debug)]
pub struct TimerQueue {
    tasks: Pool<DeferredTask>,
}

impl Default for TimerQueue {
    fn default() -> Self {
        Self { tasks: Pool::new() }
    }
}

impl TimerQueue {
    /// Advances every armed task by `dt` and returns the ones that fired.
    /// Fired tasks are disarmed before they are returned.
    pub fn advance(&mut self, dt: f32) -> Vec<TimerHandle> {
        let mut fired = Vec::new();
        for (handle, task) in self.tasks.pair_iter_mut() {
            task.remaining -= dt;
            if task.remaining <= 0.0 {
                fired.push(handle);
            }
        }
        for handle in fired.iter() {
            self.tasks.free(*handle);
        }
        fired
    }

    pub fn armed_count(&self) -> usize {
        self.tasks.alive_count() as usize
    }

    pub fn remaining(&self, handle: TimerHandle) -> Option<f32> {
        self.tasks.try_borrow(handle).map(|t| t.remaining)
    }
}

impl DeferredTimer for TimerQueue {
    fn schedule(&mut self, delay: f32) -> TimerHandle {
        self.tasks.spawn(DeferredTask { remaining: delay })
    }

    fn cancel(&mut self, handle: TimerHandle) {
        if self.tasks.is_valid_handle(handle) {
            self.tasks.free(handle);
        }
    }

    fn is_armed(&self, handle: TimerHandle) -> bool {
        self.tasks.is_valid_handle(handle)
    }
}
