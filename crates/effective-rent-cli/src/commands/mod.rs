pub mod effective_rent;
