//! Family members, the people income and saving goals are recorded against.

mod api;
mod core;
mod db;
mod page;

pub use api::{
    create_family_member_endpoint, delete_family_member_endpoint, list_family_members_endpoint,
    update_family_member_endpoint,
};
pub use core::{Designation, FamilyMember, FamilyMemberId, create_family_member_table};
pub use db::list_family_members;
pub(crate) use page::family_member_options;
pub use page::get_family_members_page;

#[cfg(test)]
pub use core::NewFamilyMember;
#[cfg(test)]
pub use db::create_family_member;
