use proc_macro2::TokenStream;
use quote::quote;
use syn::{Ident, ItemFn, ReturnType, Type};

/// Expands `#[roster_runtime::main(profile)]`.
pub fn expand_main(args: TokenStream, input: ItemFn) -> TokenStream {
    match wrap_main(args, input) {
        Ok(tokens) => tokens,
        Err(err) => err.into_compile_error(),
    }
}

fn wrap_main(args: TokenStream, input: ItemFn) -> syn::Result<TokenStream> {
    if input.sig.asyncness.is_none() {
        return Err(syn::Error::new_spanned(
            &input.sig.ident,
            "#[roster_runtime::main] can only be used on async functions",
        ));
    }
    if !returns_result(&input.sig.output) {
        return Err(syn::Error::new_spanned(
            &input.sig.output,
            "#[roster_runtime::main] requires a Result return type",
        ));
    }

    let profile = profile_constructor(args)?;
    let ItemFn { attrs, vis, sig, block } = input;
    let name = &sig.ident;
    let output = &sig.output;

    Ok(quote! {
        #(#attrs)*
        #vis fn #name() #output {
            let config = #profile;
            let runtime = ::roster_runtime::build_runtime(&config)?;
            runtime.block_on(async move #block)
        }
    })
}

fn profile_constructor(args: TokenStream) -> syn::Result<TokenStream> {
    if args.is_empty() {
        return Ok(quote! { ::roster_runtime::RuntimeConfig::default() });
    }

    let profile: Ident = syn::parse2(args)?;
    match profile.to_string().as_str() {
        "server" => Ok(quote! { ::roster_runtime::RuntimeConfig::server() }),
        "compact" => Ok(quote! { ::roster_runtime::RuntimeConfig::compact() }),
        "default" => Ok(quote! { ::roster_runtime::RuntimeConfig::default() }),
        _ => Err(syn::Error::new_spanned(
            profile,
            "unknown runtime profile; use server, compact or default",
        )),
    }
}

fn returns_result(output: &ReturnType) -> bool {
    let ReturnType::Type(_, ty) = output else {
        return false;
    };
    let Type::Path(path) = ty.as_ref() else {
        return false;
    };
    path.path.segments.last().is_some_and(|segment| segment.ident == "Result")
}
