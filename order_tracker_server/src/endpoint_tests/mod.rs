mod helpers;
mod mocks;

mod orders;
mod redirect;
mod webhook;
