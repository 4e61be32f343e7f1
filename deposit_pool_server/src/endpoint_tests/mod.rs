mod placeholders;
mod pool;
