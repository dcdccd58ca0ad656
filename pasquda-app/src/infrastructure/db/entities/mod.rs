pub mod battle;
pub mod counter;
pub mod email;
mod enums;
pub mod roast;

pub use battle::Entity as Battle;
pub use counter::Entity as Counter;
pub use email::Entity as Email;
pub use enums::{RecordStatus, RoastType};
pub use roast::Entity as Roast;
