pub mod db;
pub mod game;
pub mod history;
pub mod tokio_tools;

#[cfg(test)]
pub mod test_utils;
