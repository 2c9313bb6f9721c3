pub mod dto;
pub mod pick_service;
pub mod ports;
pub mod synthesizer;
pub mod worker;

#[cfg(test)]
pub mod testing;
