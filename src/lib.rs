//! Data model and editing core for outreach workflows: sequences of Call,
//! SMS, Email, Wait and Condition steps connected by directed edges.
//!
//! The live graph ([`graph::GraphStore`]) is edited through validated
//! helpers, then dehydrated into plain [`workflow::Workflow`] records held by
//! a [`repository::WorkflowRepository`]. [`editor::WorkflowEditor`] wires
//! these together; [`campaign::CampaignPlan`] turns a stored workflow into a
//! step schedule.

pub mod campaign;
pub mod config;
pub mod editor;
pub mod error;
pub mod graph;
pub mod persist;
pub mod repository;
pub mod workflow;
