use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use uuid::Builder;

pub type LocationID = String;
pub type GroupID = String;

/// Hands out a fresh opaque identifier for every group.
pub trait GroupIdSource {
    fn next_group_id(&mut self) -> GroupID;
}

impl<F> GroupIdSource for F
where
    F: FnMut() -> GroupID,
{
    fn next_group_id(&mut self) -> GroupID {
        self()
    }
}

/*
Version 4 UUIDs drawn from any rng. Seeding the rng makes a whole run
reproducible, ids included.
*/
pub struct RandomGroupIds<R: Rng> {
    rng: R,
}

impl RandomGroupIds<StdRng> {
    pub fn from_entropy() -> Self {
        RandomGroupIds::new(StdRng::from_entropy())
    }

    pub fn seeded(seed: u64) -> Self {
        RandomGroupIds::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> RandomGroupIds<R> {
    pub fn new(rng: R) -> Self {
        RandomGroupIds { rng }
    }
}

impl<R: Rng> GroupIdSource for RandomGroupIds<R> {
    fn next_group_id(&mut self) -> GroupID {
        let bytes: [u8; 16] = self.rng.gen();
        Builder::from_random_bytes(bytes).into_uuid().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use uuid::Uuid;

    #[test]
    fn ids_are_unique_v4_uuids() {
        let mut ids = RandomGroupIds::from_entropy();
        let drawn: HashSet<GroupID> = (0..1000).map(|_| ids.next_group_id()).collect();
        assert_eq!(drawn.len(), 1000);
        for id in drawn.iter() {
            let parsed = Uuid::parse_str(id).expect("valid uuid");
            assert_eq!(parsed.get_version_num(), 4);
            assert_eq!(id.len(), 36);
        }
    }

    #[test]
    fn seeded_ids_repeat() {
        let mut a = RandomGroupIds::seeded(42);
        let mut b = RandomGroupIds::seeded(42);
        for _ in 0..10 {
            assert_eq!(a.next_group_id(), b.next_group_id());
        }
        assert_ne!(RandomGroupIds::seeded(1).next_group_id(), RandomGroupIds::seeded(2).next_group_id());
    }

    #[test]
    fn closures_are_sources() {
        let mut n = 0;
        let mut counter = || {
            n += 1;
            format!("g{}", n)
        };
        assert_eq!(counter.next_group_id(), "g1");
        assert_eq!(counter.next_group_id(), "g2");
    }
}
