//! # board-service
//!
//! Application layer: services, DTOs and the refresh-session seam.

pub mod dto;
pub mod services;

pub use services::{
    AuthService, CommentService, ReactionService, ServiceContext, ServiceContextBuilder,
    ServiceError, ServiceResult, SessionStore, UserService,
};
