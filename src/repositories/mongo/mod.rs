//! MongoDB 어댑터

pub mod mongo_repository;

pub use mongo_repository::MongoRepository;
