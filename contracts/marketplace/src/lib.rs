//! Marketplace contract that takes CIS-1 NFTs into escrow and mediates their
//! sale at a fixed price, splitting the payment between the seller and the
//! market fee account.
#![cfg_attr(not(feature = "std"), no_std)]

mod contract;
mod events;
mod external;
mod nft;
mod state;
