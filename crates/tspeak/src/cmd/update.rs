use serde_json::{Map, Value};
use tracing::warn;
use tspeak_channel::is_positive_ack;
use tspeak_client::{ChannelKeys, FieldId};

use crate::cmd::{Context, UpdateArgs};
use crate::exit::{client_error, CliResult, FAILURE, SUCCESS};
use crate::output::print_value;

pub fn run(args: UpdateArgs, ctx: &Context) -> CliResult<i32> {
    let fields = build_fields(&args)?;
    let channel = args.channel;
    let keys = ChannelKeys::write(args.write_key);

    let body = ctx.block_on(async move {
        let client = ctx.client();
        client
            .attach_channel(channel, Some(keys))
            .map_err(|err| client_error("attach failed", err))?;
        let pending = client
            .update_channel(channel, &fields)
            .map_err(|err| client_error("update rejected", err))?;
        pending
            .await
            .map_err(|err| client_error("update failed", err))
    })?;

    print_value(&body, ctx.format);
    if is_positive_ack(&body) {
        Ok(SUCCESS)
    } else {
        warn!(channel_id = channel, "update not acknowledged");
        Ok(FAILURE)
    }
}

fn build_fields(args: &UpdateArgs) -> CliResult<Value> {
    let mut fields = Map::new();
    for (field, value) in &args.fields {
        let field = FieldId::new(*field).map_err(|err| client_error("invalid --field", err))?;
        fields.insert(format!("field{field}"), Value::String(value.clone()));
    }
    if let Some(status) = &args.status {
        fields.insert("status".to_string(), Value::String(status.clone()));
    }
    for (key, value) in &args.extra {
        fields.insert(key.clone(), Value::String(value.clone()));
    }
    Ok(Value::Object(fields))
}
