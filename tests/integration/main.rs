mod async_client;
mod sync_client;
