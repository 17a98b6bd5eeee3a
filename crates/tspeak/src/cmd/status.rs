use tspeak_client::ChannelKeys;

use crate::cmd::{to_query, Context, StatusArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_value;

pub fn run(args: StatusArgs, ctx: &Context) -> CliResult<i32> {
    let query = to_query(args.query);
    let channel = args.channel;

    let body = ctx.block_on(async move {
        let client = ctx.client();
        if let Some(read_key) = args.read_key {
            client
                .attach_channel(channel, Some(ChannelKeys::read(read_key)))
                .map_err(|err| client_error("attach failed", err))?;
        }
        client
            .get_status_updates(channel, query)
            .await
            .map_err(|err| client_error("status request failed", err))
    })?;

    print_value(&body, ctx.format);
    Ok(SUCCESS)
}
