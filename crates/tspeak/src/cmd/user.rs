use crate::cmd::{to_query, Context, UserArgs};
use crate::exit::{client_error, CliResult, SUCCESS};
use crate::output::print_value;

pub fn run(args: UserArgs, ctx: &Context) -> CliResult<i32> {
    let query = to_query(args.query);
    let body = ctx.block_on(async move {
        let client = ctx.client();
        let result = if args.channels {
            client.list_user_channels(&args.name, query).await
        } else {
            client.list_user_info(&args.name, query).await
        };
        result.map_err(|err| client_error("user request failed", err))
    })?;

    print_value(&body, ctx.format);
    Ok(SUCCESS)
}
