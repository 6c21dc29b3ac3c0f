use std::sync::{Arc, Barrier, Mutex};

/// Collective operations over a fixed pool of lock-step worker slots.
///
/// Both operations are blocking rendezvous points: a slot arriving at one
/// suspends until every slot has arrived, and afterwards every slot holds the
/// identical value. A slot that skips a collective while its peers enter it
/// stalls the pool indefinitely; callers keep all slots on the same control
/// path.
pub trait Communicator {
    fn rank(&self) -> usize;
    fn size(&self) -> usize;

    /// Distribute rank 0's value to every slot. The argument is ignored on
    /// all other ranks.
    fn broadcast(&self, value: f64) -> f64;

    /// Sum the per-slot contributions; every slot receives the same total,
    /// accumulated in ascending slot order.
    fn allreduce_sum(&self, local: f64) -> f64;
}

/// Pool of one: collectives degenerate to the identity.
#[derive(Debug, Default, Clone, Copy)]
pub struct SerialComm;

impl Communicator for SerialComm {
    fn rank(&self) -> usize {
        0
    }

    fn size(&self) -> usize {
        1
    }

    fn broadcast(&self, value: f64) -> f64 {
        value
    }

    fn allreduce_sum(&self, local: f64) -> f64 {
        local
    }
}

struct PoolShared {
    barrier: Barrier,
    root: Mutex<f64>,
    partials: Mutex<Vec<f64>>,
}

/// One slot's handle into a thread-backed pool created by [`run_spmd`].
pub struct SlotComm {
    rank: usize,
    size: usize,
    shared: Arc<PoolShared>,
}

impl Communicator for SlotComm {
    fn rank(&self) -> usize {
        self.rank
    }

    fn size(&self) -> usize {
        self.size
    }

    fn broadcast(&self, value: f64) -> f64 {
        if self.rank == 0 {
            *self.shared.root.lock().expect("worker pool mutex poisoned") = value;
        }
        self.shared.barrier.wait();
        let out = *self.shared.root.lock().expect("worker pool mutex poisoned");
        // Second rendezvous: nobody may start the next collective until every
        // slot has read this one's value.
        self.shared.barrier.wait();
        out
    }

    fn allreduce_sum(&self, local: f64) -> f64 {
        {
            let mut partials = self
                .shared
                .partials
                .lock()
                .expect("worker pool mutex poisoned");
            partials[self.rank] = local;
        }
        self.shared.barrier.wait();
        let total = {
            let partials = self
                .shared
                .partials
                .lock()
                .expect("worker pool mutex poisoned");
            partials.iter().sum()
        };
        self.shared.barrier.wait();
        total
    }
}

/// Run `body` once per slot on a pool of `num_slots` OS threads, single
/// program, multiple data. Returns the coordinator slot's value; the other
/// slots' values are identical by construction and are discarded.
pub fn run_spmd<T, F>(num_slots: usize, body: F) -> T
where
    F: Fn(&SlotComm) -> T + Sync,
{
    let num_slots = num_slots.max(1);
    let shared = Arc::new(PoolShared {
        barrier: Barrier::new(num_slots),
        root: Mutex::new(0.0),
        partials: Mutex::new(vec![0.0; num_slots]),
    });

    std::thread::scope(|scope| {
        let body = &body;
        for rank in 1..num_slots {
            let comm = SlotComm {
                rank,
                size: num_slots,
                shared: Arc::clone(&shared),
            };
            scope.spawn(move || {
                body(&comm);
            });
        }
        let coordinator = SlotComm {
            rank: 0,
            size: num_slots,
            shared: Arc::clone(&shared),
        };
        body(&coordinator)
    })
}
