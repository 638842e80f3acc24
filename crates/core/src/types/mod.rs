//! Shared newtype wrappers.

mod friend_code;
mod id;
mod key;
mod price;
mod status;

pub use friend_code::{FriendCode, FriendCodeError};
pub use id::ItemId;
pub use key::GiftKey;
pub use price::Price;
pub use status::OwnershipStatus;
