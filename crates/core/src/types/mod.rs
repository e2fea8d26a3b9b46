//! Shared domain types.
//!
//! Row types mirror the tables of the remote store one-to-one and derive
//! `Serialize`/`Deserialize` so they can travel through the generic table
//! contract unchanged.

mod banner;
mod cart;
mod id;
mod money;
mod notification;
mod order;
mod perfume;
mod setting;
mod status;
mod user;

pub use banner::Banner;
pub use cart::{CartItem, WishlistItem};
pub use id::{
    BannerId, CartItemId, NotificationId, OrderId, OrderItemId, PerfumeId, UserId, WishlistItemId,
};
pub use money::format_bdt;
pub use notification::{AdminNotification, NotificationKind};
pub use order::{Order, OrderItem};
pub use perfume::{Category, Perfume};
pub use setting::Setting;
pub use status::{OrderStatus, ParseStatusError, PaymentMethod};
pub use user::{StoreUser, UserRole};
