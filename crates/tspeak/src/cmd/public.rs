use crate::cmd::{to_query, Context, PublicArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_value;

pub fn run(args: PublicArgs, ctx: &Context) -> CliResult<i32> {
    let query = to_query(args.query);
    let body = ctx.block_on(async move {
        ctx.client()
            .list_public_channels(query)
            .await
            .map_err(|err| client_error("public channel listing failed", err))
    })?;

    print_value(&body, ctx.format);
    Ok(SUCCESS)
}
