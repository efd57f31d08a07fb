use crate::{fees, storage, types::FeeConfig};
use shared::{errors::Error, events::CONFIG_UPDATED};
use soroban_sdk::{Address, Env, Symbol};

/// Caller must be the stored owner and must authorize the call.
pub fn require_owner(env: &Env, caller: &Address) -> Result<(), Error> {
    let owner = storage::get_owner(env)?;
    if owner != *caller {
        return Err(Error::Unauthorized);
    }
    caller.require_auth();
    Ok(())
}

/// Applies `update` to the fee configuration, re-validates it and stores it.
pub fn update_fee_config<F>(env: &Env, caller: &Address, field: Symbol, update: F) -> Result<FeeConfig, Error>
where
    F: FnOnce(&mut FeeConfig),
{
    require_owner(env, caller)?;

    let mut config = storage::get_fee_config(env)?;
    update(&mut config);
    fees::validate_config(&config)?;
    storage::set_fee_config(env, &config);

    env.events().publish((CONFIG_UPDATED, field), caller.clone());
    Ok(config)
}
