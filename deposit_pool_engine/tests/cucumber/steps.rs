use std::str::FromStr;

use chrono::{Duration, Utc};
use cucumber::{given, then, when};
use deposit_pool_engine::{
    allocation_objects::SweepResult,
    db_types::{NewDepositAddress, OrderId, OrderStatus},
    AddressStore,
    AllocationError,
};

use crate::{cucumber::PoolWorld, support::usdt};

fn parse_error(name: &str) -> AllocationError {
    match name {
        "PoolExhausted" => AllocationError::PoolExhausted,
        "NoAvailableAddress" => AllocationError::NoAvailableAddress,
        _ => panic!("Unsupported error in feature file: {name}"),
    }
}

fn parse_list(list: &str) -> Vec<String> {
    if list.trim() == "nothing" {
        return vec![];
    }
    list.split(',').map(|s| s.trim().to_string()).filter(|s| !s.is_empty()).collect()
}

//-------------------------------------------   Pool   -----------------------------------------------------------------

#[given(regex = r"^the pool holds (.+)$")]
async fn seed_pool(world: &mut PoolWorld, list: String) {
    let addresses = parse_list(&list);
    world.system().allocator.flush_pool(&addresses).await.expect("Error seeding pool");
}

#[when(expr = "I pop an address for {word} USDT")]
async fn pop_address(world: &mut PoolWorld, amount: String) {
    let result = world.system().allocator.pop(usdt(&amount)).await;
    world.last_pop = Some(result);
}

#[then(expr = "the popped address is {word}")]
async fn check_popped(world: &mut PoolWorld, expected: String) {
    let popped = world.last_pop.as_ref().expect("Nothing was popped");
    assert_eq!(popped.as_ref().expect("Pop failed"), &expected);
}

#[then(expr = "the pop fails with {word}")]
async fn check_pop_failed(world: &mut PoolWorld, error: String) {
    let popped = world.last_pop.as_ref().expect("Nothing was popped");
    assert_eq!(popped.as_ref().expect_err("Pop succeeded"), &parse_error(&error));
}

#[then(regex = r"^the pool is (.+)$")]
async fn check_pool(world: &mut PoolWorld, list: String) {
    let pool = world.system().store.pool_snapshot().expect("Error reading pool");
    assert_eq!(pool, parse_list(&list));
}

//---------------------------------------   Placeholders   -------------------------------------------------------------

#[given(expr = "order {word} waits on {word} for {word} USDT")]
async fn register_placeholder(world: &mut PoolWorld, order_id: String, address: String, amount: String) {
    let order_id = OrderId::from(order_id);
    world.system().allocator.register_placeholder(&address, &order_id, usdt(&amount)).await.expect("Error registering");
}

#[given(expr = "order {word} has been waiting on {word} for {word} USDT for {int} minutes")]
async fn register_aged_placeholder(world: &mut PoolWorld, order_id: String, address: String, amount: String, age: i64) {
    let created_at = Utc::now() - Duration::minutes(age);
    let order_id = OrderId::from(order_id);
    world.system().store.add_created_at(&address, &order_id, usdt(&amount), created_at).expect("Error registering");
}

#[when(expr = "order {word} is released from {word}")]
async fn release_placeholder(world: &mut PoolWorld, order_id: String, address: String) {
    let order_id = OrderId::from(order_id);
    world.system().allocator.remove_placeholder(&address, &order_id).await.expect("Error releasing placeholder");
}

#[then(expr = "address {word} holds {int} placeholder(s) near {word} USDT")]
async fn check_placeholders(world: &mut PoolWorld, address: String, count: usize, amount: String) {
    let found = world.system().allocator.query_placeholders(&address, usdt(&amount), None).await.expect("Query failed");
    assert_eq!(found.len(), count, "{found:?}");
}

//----------------------------------------   Allocation   --------------------------------------------------------------

#[when(expr = "order {word} is allocated {word} USDT")]
async fn allocate(world: &mut PoolWorld, order_id: String, amount: String) {
    let order_id = OrderId::from(order_id);
    let result = world.system().allocator.allocate(&order_id, usdt(&amount)).await;
    world.last_allocation = Some(result);
}

#[then(expr = "order {word} was allocated {word}")]
async fn check_allocation(world: &mut PoolWorld, order_id: String, address: String) {
    let allocation = world.last_allocation.as_ref().expect("Nothing was allocated");
    let allocation = allocation.as_ref().expect("Allocation failed");
    assert_eq!(allocation.order_id, OrderId::from(order_id));
    assert_eq!(allocation.address, address);
}

#[then(expr = "the allocation fails with {word}")]
async fn check_allocation_failed(world: &mut PoolWorld, error: String) {
    let allocation = world.last_allocation.as_ref().expect("Nothing was allocated");
    assert_eq!(allocation.as_ref().expect_err("Allocation succeeded"), &parse_error(&error));
}

//-----------------------------------------   Catalog   ----------------------------------------------------------------

#[given(expr = "the catalog contains {word} with priority {int}")]
async fn add_catalog_address(world: &mut PoolWorld, address: String, priority: i64) {
    let address = NewDepositAddress::new(address).with_priority(priority);
    world.system().catalog.insert_address(address).await.expect("Error adding address");
}

#[given(expr = "the catalog contains {word} with priority {int}, disabled")]
async fn add_disabled_catalog_address(world: &mut PoolWorld, address: String, priority: i64) {
    let address = NewDepositAddress::new(address).with_priority(priority).disabled();
    world.system().catalog.insert_address(address).await.expect("Error adding address");
}

#[when(expr = "address {word} is disabled")]
async fn disable_address(world: &mut PoolWorld, address: String) {
    world.system().catalog.set_address_enabled(&address, false).await.expect("Error disabling address");
}

#[when("the pool is refreshed")]
async fn refresh_pool(world: &mut PoolWorld) {
    world.system().refresh.refresh().await.expect("Error refreshing pool");
}

//-----------------------------------------   Janitor   ----------------------------------------------------------------

#[given(expr = "the order store reports order {word} as {word}")]
async fn set_order_status(world: &mut PoolWorld, order_id: String, status: String) {
    let status = OrderStatus::from_str(&status).expect("Not a valid order status");
    world.system().orders.set_status(&order_id, status);
}

#[when(expr = "the janitor sweeps placeholders older than {int} minutes")]
async fn sweep(world: &mut PoolWorld, minutes: i64) {
    let result = world.system().janitor.sweep(Duration::minutes(minutes)).await.expect("Sweep failed");
    world.last_sweep = Some(result);
}

#[then(expr = "the janitor removed {int} and kept {int} placeholder(s)")]
async fn check_sweep(world: &mut PoolWorld, removed: usize, retained: usize) {
    assert_eq!(world.last_sweep, Some(SweepResult { removed, retained }));
}
