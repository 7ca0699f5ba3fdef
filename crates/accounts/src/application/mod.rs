//! Use cases orchestrating the identity gateway, profile repository and
//! session store. One struct per operation, generic over the ports.

pub mod current_user;
pub mod login;
pub mod logout;
pub mod register;
pub mod update_profile;

pub use current_user::CurrentUserUseCase;
pub use login::LoginUseCase;
pub use logout::LogoutUseCase;
pub use register::{RegisterInput, RegisterUseCase};
pub use update_profile::UpdateProfileUseCase;

#[cfg(test)]
pub(crate) mod testing;
