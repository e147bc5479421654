mod collision;
mod entity;
mod interaction;
mod map;
mod proximity;
mod session;

pub(crate) use map::MapError;
pub(crate) use session::GameSession;

#[cfg(test)]
mod tests;
