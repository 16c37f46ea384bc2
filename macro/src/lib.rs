extern crate proc_macro;

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse::Parser, punctuated::Punctuated};

#[derive(Debug, Default)]
struct DtoFlags {
    pub clone: bool,
    pub eq: bool,
    pub request: bool,
    pub response: bool,
}

impl DtoFlags {
    fn parse(args: impl Iterator<Item = syn::Ident>) -> syn::Result<Self> {
        let mut flags = Self::default();
        for flag in args {
            match flag.to_string().as_str() {
                "clone" => flags.clone = true,
                "eq" => flags.eq = true,
                "request" => flags.request = true,
                "response" => flags.response = true,
                other => {
                    return Err(syn::Error::new(
                        flag.span(),
                        format!("Unknown dto flag: {other}"),
                    ));
                }
            }
        }
        Ok(flags)
    }
}

/// Marks a type as a data transfer object of a precept (`chat`, ...).
///
/// `#[dto(chat, request)]` derives `Deserialize` when the `chat-in` feature is
/// enabled (the server reads requests) and `Serialize` under `chat-out` (the
/// client writes them). `response` is the mirror image. Passing both derives
/// both unconditionally. `clone` and `eq` add the matching std derives.
#[proc_macro_attribute]
pub fn dto(attr: TokenStream, item: TokenStream) -> TokenStream {
    match expand_dto(attr.into(), item.into()) {
        Ok(tokens) => tokens.into(),
        Err(error) => error.to_compile_error().into(),
    }
}

fn expand_dto(
    attr: proc_macro2::TokenStream,
    item: proc_macro2::TokenStream,
) -> syn::Result<proc_macro2::TokenStream> {
    let args = Punctuated::<syn::Ident, syn::Token![,]>::parse_separated_nonempty.parse2(attr)?;
    let mut args = args.into_iter();

    let precept_name = args.next().ok_or_else(|| {
        syn::Error::new(
            proc_macro2::Span::call_site(),
            "Expected precept name as first argument",
        )
    })?;
    let flags = DtoFlags::parse(args)?;

    let mut item: syn::Item = syn::parse2(item)?;
    let feature_in = format!("{}-in", precept_name);
    let feature_out = format!("{}-out", precept_name);

    let item_attrs = match &mut item {
        syn::Item::Struct(s) => &mut s.attrs,
        syn::Item::Enum(e) => &mut e.attrs,
        other => {
            return Err(syn::Error::new_spanned(
                other,
                "dto macro only supports structs and enums",
            ));
        }
    };

    let mut universal_derives: Vec<syn::Path> = vec![syn::parse_quote!(Debug)];

    if flags.clone {
        universal_derives.push(syn::parse_quote!(Clone));
    }

    if flags.eq {
        universal_derives.push(syn::parse_quote!(PartialEq));
    }

    if flags.request && flags.response {
        universal_derives.push(syn::parse_quote!(Serialize));
        universal_derives.push(syn::parse_quote!(Deserialize));
    } else if flags.request {
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_in, derive(Deserialize))]
        });
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_out, derive(Serialize))]
        });
    } else if flags.response {
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_in, derive(Serialize))]
        });
        item_attrs.push(syn::parse_quote! {
            #[cfg_attr(feature = #feature_out, derive(Deserialize))]
        });
    }

    item_attrs.push(syn::parse_quote! {
        #[derive(#(#universal_derives),*)]
    });

    Ok(quote! { #item })
}
