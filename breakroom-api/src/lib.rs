pub mod cache;
pub mod render;
pub mod server;

#[cfg(test)]
mod test_util;
