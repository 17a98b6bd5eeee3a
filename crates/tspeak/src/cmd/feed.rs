use tspeak_client::ChannelKeys;

use crate::cmd::{to_query, Context, FeedArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_value;

pub fn run(args: FeedArgs, ctx: &Context) -> CliResult<i32> {
    let query = to_query(args.query);
    let channel = args.channel;

    let body = ctx.block_on(async move {
        let client = ctx.client();
        if let Some(read_key) = args.read_key {
            client
                .attach_channel(channel, Some(ChannelKeys::read(read_key)))
                .map_err(|err| client_error("attach failed", err))?;
        }

        let result = match (args.field, args.last) {
            (Some(field), true) => {
                client
                    .get_last_entry_in_field_feed(channel, field, query)
                    .await
            }
            (Some(field), false) => client.get_field_feed(channel, field, query).await,
            (None, true) => client.get_last_entry_in_channel_feed(channel, query).await,
            (None, false) => client.get_channel_feeds(channel, query).await,
        };
        result.map_err(|err| client_error("feed request failed", err))
    })?;

    print_value(&body, ctx.format);
    Ok(SUCCESS)
}
