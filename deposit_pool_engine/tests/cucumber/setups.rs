use cucumber::given;

use crate::cucumber::{pool_world::PoolSystem, PoolWorld};

#[given("a fresh deposit pool")]
async fn fresh_pool(world: &mut PoolWorld) {
    let system = PoolSystem::new().await;
    world.system = Some(system);
}
