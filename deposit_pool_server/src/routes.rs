//! Request handler definitions
//!
//! Define each route and its handler here.
//! Handlers that need a backend are generic over the backend trait, so that tests can swap in a mock or the in-memory
//! store. Construct them with the generated `...Route::<Backend>::new()` structs, e.g. `PopRoute::<RedisStore>::new()`.
//!
//! Amounts are always exchanged as JSON strings (e.g. `"100.25"`). Numeric amounts are accepted on input.
use actix_web::{get, web, HttpResponse, Responder};
use deposit_pool_engine::{
    db_types::NewDepositAddress,
    helpers::validate_tron_address,
    AddressAllocator,
    AddressStore,
    DepositStore,
    PoolRefreshApi,
    PoolRegistry,
};
use log::*;

use crate::{
    data_objects::{
        AddressUpdate,
        AllocateRequest,
        FlushPoolRequest,
        JsonResponse,
        PlaceholderPath,
        PlaceholderQuery,
        PlaceholderRequest,
        PoolSizeResponse,
        PopRequest,
        PopResponse,
    },
    errors::ServerError,
};

// Web-actix cannot handle generics in handlers, so it's implemented manually using the `route!` macro
#[macro_export]
macro_rules! route {
    ($name:ident => $method:ident $path:literal impl $($bounds:ty),+) => {
        paste::paste! { pub struct [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ >( $( core::marker::PhantomData<fn() -> [< T $bounds:camel> ] >,)+ );}
        paste::paste! { impl< $( [< T $bounds:camel> ],)+ > [<$name:camel Route>]< $( [< T $bounds:camel> ],)+ > {
            #[allow(clippy::new_without_default)]
            pub fn new() -> Self {
                Self($( core::marker::PhantomData::<fn() -> [< T $bounds:camel> ] >,)+)
            }
        }}
        paste::paste! { impl<$( [< T $bounds:camel >] , )+> actix_web::dev::HttpServiceFactory for [<$name:camel Route>]<$([<T $bounds:camel>],)+>
        where
            $([<T $bounds:camel>]: $bounds + 'static,)+
        {
            fn register(self, config: &mut actix_web::dev::AppService) {
                let res = actix_web::Resource::new($path)
                    .name(stringify!($name))
                    .guard(actix_web::guard::$method())
                    .to($name::< $( [< T $bounds:camel >], )+>);
                actix_web::dev::HttpServiceFactory::register(res, config);
            }
        }}
    };
}

// ----------------------------------------------   Health  ----------------------------------------------------
#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

// ----------------------------------------------   Pool  ----------------------------------------------------

route!(pool_size => Get "/pool/size" impl DepositStore);
/// Route handler for `GET /pool/size`. Returns the number of addresses currently in rotation.
pub async fn pool_size<B: DepositStore>(api: web::Data<AddressAllocator<B>>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET pool size");
    let size = api.pool_size().await?;
    Ok(HttpResponse::Ok().json(PoolSizeResponse { size }))
}

route!(flush_pool => Put "/pool" impl DepositStore);
/// Route handler for `PUT /pool`.
///
/// Replaces the pool with the given addresses, in the given order. Every address must be a valid TRON address. An
/// empty list empties the pool, after which nothing can be allocated until the pool is replaced or refreshed.
///
/// The catalog is not consulted or changed. The next scheduled refresh will overwrite this pool with the catalog's
/// active addresses, unless the refresh worker is disabled.
pub async fn flush_pool<B: DepositStore>(
    body: web::Json<FlushPoolRequest>,
    api: web::Data<AddressAllocator<B>>,
) -> Result<HttpResponse, ServerError> {
    let FlushPoolRequest { addresses } = body.into_inner();
    debug!("💻️ PUT pool with {} addresses", addresses.len());
    for address in &addresses {
        validate_tron_address(address).map_err(|e| ServerError::InvalidAddress(format!("{address}: {e}")))?;
    }
    api.flush_pool(&addresses).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Pool replaced with {} addresses", addresses.len()))))
}

route!(refresh_pool => Post "/pool/refresh" impl AddressStore, PoolRegistry);
/// Route handler for `POST /pool/refresh`. Rebuilds the pool from the catalog's active addresses and returns the new
/// pool size.
pub async fn refresh_pool<A: AddressStore, B: PoolRegistry>(
    api: web::Data<PoolRefreshApi<A, B>>,
) -> Result<HttpResponse, ServerError> {
    debug!("💻️ POST pool refresh");
    let size = api.refresh().await.map_err(|e| {
        warn!("💻️ Pool refresh failed. {e}");
        e
    })?;
    Ok(HttpResponse::Ok().json(PoolSizeResponse { size }))
}

route!(pop => Post "/pool/pop" impl DepositStore);
/// Route handler for `POST /pool/pop`.
///
/// Returns an address that has no pending order within the collision tolerance of `amount`. Nothing is reserved: the
/// caller must follow up with `POST /placeholders`. Prefer `POST /allocate`, which does both in one step.
///
/// Errors:
/// * 503 if the pool is empty.
/// * 409 if every address in the pool has a pending order near this amount.
pub async fn pop<B: DepositStore>(
    body: web::Json<PopRequest>,
    api: web::Data<AddressAllocator<B>>,
) -> Result<HttpResponse, ServerError> {
    let amount = body.into_inner().amount;
    debug!("💻️ POST pop for {amount}");
    let address = api.pop(amount).await?;
    Ok(HttpResponse::Ok().json(PopResponse { address }))
}

route!(allocate => Post "/allocate" impl DepositStore);
/// Route handler for `POST /allocate`.
///
/// Picks an address for the order and registers its placeholder in one step. The response body is the allocation:
/// `{"address": ..., "order_id": ..., "amount": ...}`. Retrying for the same order id is safe.
pub async fn allocate<B: DepositStore>(
    body: web::Json<AllocateRequest>,
    api: web::Data<AddressAllocator<B>>,
) -> Result<HttpResponse, ServerError> {
    let AllocateRequest { order_id, amount } = body.into_inner();
    debug!("💻️ POST allocate for order {order_id} ({amount})");
    let allocation = api.allocate(&order_id, amount).await?;
    Ok(HttpResponse::Ok().json(allocation))
}

// ----------------------------------------------   Placeholders  ----------------------------------------------------

route!(register_placeholder => Post "/placeholders" impl DepositStore);
pub async fn register_placeholder<B: DepositStore>(
    body: web::Json<PlaceholderRequest>,
    api: web::Data<AddressAllocator<B>>,
) -> Result<HttpResponse, ServerError> {
    let PlaceholderRequest { address, order_id, amount } = body.into_inner();
    debug!("💻️ POST placeholder for order {order_id} ({amount}) on {address}");
    api.register_placeholder(&address, &order_id, amount).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order {order_id} is waiting on {address}"))))
}

route!(remove_placeholder => Delete "/placeholders/{address}/{order_id}" impl DepositStore);
/// Route handler for `DELETE /placeholders/{address}/{order_id}`. Removing a placeholder that does not exist
/// succeeds.
pub async fn remove_placeholder<B: DepositStore>(
    path: web::Path<PlaceholderPath>,
    api: web::Data<AddressAllocator<B>>,
) -> Result<HttpResponse, ServerError> {
    let PlaceholderPath { address, order_id } = path.into_inner();
    debug!("💻️ DELETE placeholder for order {order_id} on {address}");
    api.remove_placeholder(&address, &order_id).await?;
    Ok(HttpResponse::Ok().json(JsonResponse::success(format!("Order {order_id} released from {address}"))))
}

route!(query_placeholders => Get "/placeholders/{address}" impl DepositStore);
/// Route handler for `GET /placeholders/{address}?amount=..&tolerance=..`.
///
/// Returns the pending orders on `address` whose amounts lie within `tolerance` of `amount`, lowest amount first.
/// The configured collision tolerance is used when `tolerance` is omitted. Pass `tolerance=0` for exact matches.
pub async fn query_placeholders<B: DepositStore>(
    path: web::Path<String>,
    query: web::Query<PlaceholderQuery>,
    api: web::Data<AddressAllocator<B>>,
) -> Result<HttpResponse, ServerError> {
    let address = path.into_inner();
    let PlaceholderQuery { amount, tolerance } = query.into_inner();
    trace!("💻️ GET placeholders on {address} near {amount}");
    let placeholders = api.query_placeholders(&address, amount, tolerance).await?;
    Ok(HttpResponse::Ok().json(placeholders))
}

// ----------------------------------------------   Catalog  ----------------------------------------------------

route!(addresses => Get "/addresses" impl AddressStore);
/// Route handler for `GET /addresses`. Lists every address in the catalog, enabled or not, highest priority first.
pub async fn addresses<A: AddressStore>(catalog: web::Data<A>) -> Result<HttpResponse, ServerError> {
    trace!("💻️ GET addresses");
    let addresses = catalog.fetch_all_addresses().await?;
    Ok(HttpResponse::Ok().json(addresses))
}

route!(add_address => Post "/addresses" impl AddressStore);
/// Route handler for `POST /addresses`.
///
/// Adds a receiving address to the catalog. `is_active` defaults to true and `priority` to 1. The address enters the
/// pool at the next refresh.
pub async fn add_address<A: AddressStore>(
    body: web::Json<NewDepositAddress>,
    catalog: web::Data<A>,
) -> Result<HttpResponse, ServerError> {
    let address = body.into_inner();
    info!("💻️ POST new catalog address {}", address.address);
    let record = catalog.insert_address(address).await.map_err(|e| {
        debug!("💻️ Could not add address. {e}");
        e
    })?;
    Ok(HttpResponse::Created().json(record))
}

route!(update_address => Patch "/addresses/{address}" impl AddressStore);
/// Route handler for `PATCH /addresses/{address}`.
///
/// Enables or disables an address (`is_active`), and/or changes its priority. Changes reach the pool at the next
/// refresh.
pub async fn update_address<A: AddressStore>(
    path: web::Path<String>,
    body: web::Json<AddressUpdate>,
    catalog: web::Data<A>,
) -> Result<HttpResponse, ServerError> {
    let address = path.into_inner();
    let AddressUpdate { is_active, priority } = body.into_inner();
    debug!("💻️ PATCH catalog address {address}: is_active={is_active:?}, priority={priority:?}");
    let mut record = match is_active {
        Some(enabled) => Some(catalog.set_address_enabled(&address, enabled).await?),
        None => None,
    };
    if let Some(priority) = priority {
        record = Some(catalog.set_address_priority(&address, priority).await?);
    }
    let record =
        record.ok_or_else(|| ServerError::InvalidRequestBody("Provide at least one of is_active or priority".into()))?;
    Ok(HttpResponse::Ok().json(record))
}
